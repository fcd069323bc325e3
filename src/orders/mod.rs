//! Per-user order history and the order lifecycle.

pub mod entity;
mod lifecycle;

pub use lifecycle::*;

use std::time::Duration;

use crate::actor_framework::ResourceActor;
use crate::clients::OrderBookClient;
use crate::domain::UserOrders;

/// Creates a new order book actor and its client.
pub fn new(buffer_size: usize, timeout: Duration) -> (ResourceActor<UserOrders>, OrderBookClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, timeout);
    (actor, OrderBookClient::new(generic_client))
}
