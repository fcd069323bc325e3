use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::actor_framework::Versioned;
use crate::domain::{Order, UserOrders};
use crate::error::OrderError;
use crate::events::{AnalyticsEvent, EventSink};
use crate::retry::{retry_on_conflict, RetryPolicy};
use crate::store::OrderStore;

/// Records, lists and cancels orders in a user's history.
///
/// Every write replaces the user's whole collection with a compare-and-swap,
/// so a cancel racing with a new order for the same user cannot lose either.
#[derive(Clone)]
pub struct OrderLifecycle {
    store: Arc<dyn OrderStore>,
    retry: RetryPolicy,
    events: Arc<dyn EventSink>,
}

impl OrderLifecycle {
    pub fn new(store: Arc<dyn OrderStore>, retry: RetryPolicy, events: Arc<dyn EventSink>) -> Self {
        Self { store, retry, events }
    }

    /// Appends `order` to the user's history, creating the history on the
    /// first order. Identical orders are kept side by side.
    #[instrument(skip(self, order), fields(order_id = %order.order_id))]
    pub async fn record_order(&self, user_id: &str, order: Order) -> Result<(), OrderError> {
        let count = retry_on_conflict(&self.retry, || self.try_record(user_id, order.clone())).await?;
        info!(order_count = count, "Order recorded");
        Ok(())
    }

    async fn try_record(&self, user_id: &str, order: Order) -> Result<usize, OrderError> {
        match self.store.get_orders(user_id).await? {
            None => {
                self.store
                    .swap_orders(None, UserOrders::new(user_id, order))
                    .await?;
                Ok(1)
            }
            Some(Versioned { version, value: mut history }) => {
                history.orders.push(order);
                let count = history.orders.len();
                self.store.swap_orders(Some(version), history).await?;
                Ok(count)
            }
        }
    }

    /// The user's orders in the order they were placed.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, user_id: &str) -> Result<Vec<Order>, OrderError> {
        match self.store.get_orders(user_id).await? {
            Some(Versioned { value, .. }) => {
                info!(order_count = value.orders.len(), "Orders listed");
                Ok(value.orders)
            }
            None => {
                error!("User has no orders");
                Err(OrderError::NotFound(format!("orders of user {user_id}")))
            }
        }
    }

    /// Moves the first order with `order_id` from pending to cancelled and
    /// returns it as stored.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, user_id: &str, order_id: &str) -> Result<Order, OrderError> {
        let cancelled = retry_on_conflict(&self.retry, || self.try_cancel(user_id, order_id))
            .await
            .inspect_err(|e| error!(error = %e, "Cancellation refused"))?;

        info!("Order cancelled");
        self.events.record(AnalyticsEvent::order_cancelled(user_id, order_id));
        Ok(cancelled)
    }

    async fn try_cancel(&self, user_id: &str, order_id: &str) -> Result<Order, OrderError> {
        let Versioned { version, value: mut history } = self
            .store
            .get_orders(user_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("orders of user {user_id}")))?;

        let order = history
            .find_mut(order_id)
            .ok_or_else(|| OrderError::NotFound(format!("order {order_id}")))?;
        order.cancel()?;
        let cancelled = order.clone();

        self.store.swap_orders(Some(version), history).await?;
        Ok(cancelled)
    }
}
