//! Restaurant catalog: the actor that owns restaurant documents, the
//! catalog-management actions it accepts, and the read-only resolver the
//! order paths use.

mod actions;
pub mod entity;
pub mod reader;

pub use actions::*;
pub use reader::*;

use std::time::Duration;

use crate::actor_framework::ResourceActor;
use crate::clients::CatalogClient;
use crate::domain::Restaurant;

/// Creates a new catalog actor and its client.
pub fn new(buffer_size: usize, timeout: Duration) -> (ResourceActor<Restaurant>, CatalogClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size, timeout);
    (actor, CatalogClient::new(generic_client))
}
