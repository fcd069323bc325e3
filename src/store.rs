//! Store seams used by the order core.
//!
//! The core only ever sees these traits, injected through constructors. The
//! production implementations are the actor clients in [`crate::clients`];
//! tests substitute their own.

use async_trait::async_trait;

use crate::actor_framework::Versioned;
use crate::domain::{Restaurant, UserOrders};
use crate::error::OrderError;

/// Catalog documents keyed by restaurant id, with single-document
/// compare-and-swap.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_restaurants(&self) -> Result<Vec<Versioned<Restaurant>>, OrderError>;

    async fn get_restaurant(&self, restaurant_id: &str) -> Result<Option<Versioned<Restaurant>>, OrderError>;

    /// Replaces the restaurant document if it is still at `expected_version`.
    /// A stale version fails with [`OrderError::Conflict`].
    async fn swap_restaurant(&self, expected_version: u64, restaurant: Restaurant) -> Result<u64, OrderError>;
}

/// One embedded order collection per user.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_orders(&self, user_id: &str) -> Result<Option<Versioned<UserOrders>>, OrderError>;

    /// Writes the whole collection. `expected_version: None` creates it and
    /// fails with [`OrderError::Conflict`] if another writer got there first.
    async fn swap_orders(&self, expected_version: Option<u64>, orders: UserOrders) -> Result<u64, OrderError>;
}
