use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::actor_framework::{ResourceClient, Versioned};
use crate::domain::UserOrders;
use crate::error::OrderError;
use crate::store::OrderStore;

/// Client for the per-user order book actor.
#[derive(Clone)]
pub struct OrderBookClient {
    inner: ResourceClient<UserOrders>,
}

impl OrderBookClient {
    pub fn new(inner: ResourceClient<UserOrders>) -> Self {
        Self { inner }
    }

    pub async fn shutdown(&self) -> Result<(), OrderError> {
        debug!("Sending shutdown request");
        self.inner.shutdown().await.map_err(OrderError::from)
    }
}

#[async_trait]
impl OrderStore for OrderBookClient {
    #[instrument(skip(self))]
    async fn get_orders(&self, user_id: &str) -> Result<Option<Versioned<UserOrders>>, OrderError> {
        debug!("Sending request");
        self.inner.get(user_id.to_string()).await.map_err(OrderError::from)
    }

    #[instrument(skip(self, orders), fields(user_id = %orders.user_id, order_count = orders.orders.len()))]
    async fn swap_orders(&self, expected_version: Option<u64>, orders: UserOrders) -> Result<u64, OrderError> {
        debug!("Sending request");
        self.inner
            .compare_and_swap(expected_version, orders)
            .await
            .map_err(OrderError::from)
    }
}
