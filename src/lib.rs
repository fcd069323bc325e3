//! Order-intake core: a restaurant catalog with a single stock counter per
//! product, optimistic stock reservation, claim codes, and per-user order
//! histories, all kept in actor-owned document stores.

pub mod actor_framework;
pub mod app_system;
pub mod catalog;
pub mod claim_code;
pub mod clients;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod orders;
pub mod placement;
pub mod retry;
pub mod stock;
pub mod store;

#[cfg(test)]
mod mock_framework;

pub use app_system::{setup_tracing, OrderSystem};
pub use config::OrderSystemConfig;
pub use error::OrderError;
