use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use crate::catalog::{self, CatalogReader};
use crate::clients::{CatalogClient, OrderBookClient};
use crate::config::OrderSystemConfig;
use crate::domain::NewRestaurant;
use crate::error::OrderError;
use crate::events::{EventSink, TracingEventSink};
use crate::orders::{self, OrderLifecycle};
use crate::placement::OrderPlacement;
use crate::stock::StockLedger;
use crate::store::{CatalogStore, OrderStore};

/// Starts the store actors and wires the order core on top of them.
///
/// Dependencies are built bottom-up: the two store actors first, then the
/// reader, ledger and lifecycle that share them, then the placement
/// orchestrator that composes those.
pub struct OrderSystem {
    pub catalog_client: CatalogClient,
    pub order_book_client: OrderBookClient,
    pub placement: OrderPlacement,
    pub lifecycle: OrderLifecycle,
    handles: Vec<JoinHandle<()>>,
}

impl Default for OrderSystem {
    fn default() -> Self {
        Self::new(OrderSystemConfig::default())
    }
}

impl OrderSystem {
    /// Starts the system with analytics events going to the log.
    pub fn new(config: OrderSystemConfig) -> Self {
        Self::with_event_sink(config, Arc::new(TracingEventSink))
    }

    #[instrument(name = "order_system", skip(events))]
    pub fn with_event_sink(config: OrderSystemConfig, events: Arc<dyn EventSink>) -> Self {
        let mut handles = Vec::new();

        info!("Starting order system");

        let (catalog_actor, catalog_client) = catalog::new(config.buffer_size, config.store_timeout);
        handles.push(tokio::spawn(catalog_actor.run()));

        let (order_book_actor, order_book_client) = orders::new(config.buffer_size, config.store_timeout);
        handles.push(tokio::spawn(order_book_actor.run()));

        let catalog_store: Arc<dyn CatalogStore> = Arc::new(catalog_client.clone());
        let order_store: Arc<dyn OrderStore> = Arc::new(order_book_client.clone());

        let lifecycle = OrderLifecycle::new(order_store, config.retry.clone(), events.clone());
        let placement = OrderPlacement::new(
            CatalogReader::new(catalog_store.clone()),
            StockLedger::new(catalog_store, config.retry),
            lifecycle.clone(),
            events,
        );

        info!("Order system started successfully");

        Self {
            catalog_client,
            order_book_client,
            placement,
            lifecycle,
            handles,
        }
    }

    /// Registers each restaurant in turn and returns the assigned ids.
    /// Stops at the first restaurant the catalog refuses.
    #[instrument(skip(self, restaurants), fields(count = restaurants.len()))]
    pub async fn seed(&self, restaurants: Vec<NewRestaurant>) -> Result<Vec<String>, OrderError> {
        let mut ids = Vec::with_capacity(restaurants.len());
        for restaurant in restaurants {
            ids.push(self.catalog_client.register_restaurant(restaurant).await?);
        }
        info!(seeded = ids.len(), "Catalog seeded");
        Ok(ids)
    }

    /// Stops both store actors and waits for their tasks.
    ///
    /// Shutdown errors are logged and do not stop the remaining actors from
    /// being shut down.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), OrderError> {
        info!("Shutting down order system");

        if let Err(e) = self.catalog_client.shutdown().await {
            error!(error = %e, "Catalog shutdown request failed");
        }
        if let Err(e) = self.order_book_client.shutdown().await {
            error!(error = %e, "Order book shutdown request failed");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(OrderError::Unavailable(format!("actor task failed: {e}")));
            }
        }

        info!("Order system shutdown complete");
        Ok(())
    }
}
