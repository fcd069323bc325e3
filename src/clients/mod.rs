//! Typed handles over the generic resource actors.

mod catalog_client;
mod order_book_client;

pub use catalog_client::CatalogClient;
pub use order_book_client::OrderBookClient;
