use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use crate::actor_framework::{ResourceClient, Versioned};
use crate::catalog::RestaurantAction;
use crate::domain::{NewRestaurant, Product, Restaurant};
use crate::error::OrderError;
use crate::store::CatalogStore;

/// Client for the catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<Restaurant>,
    next_id: Arc<AtomicU64>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<Restaurant>) -> Self {
        Self {
            inner,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Adds a restaurant to the catalog and returns its id.
    ///
    /// A restaurant whose product has no stock is refused.
    #[instrument(skip(self, restaurant), fields(restaurant_name = %restaurant.name))]
    pub async fn register_restaurant(&self, restaurant: NewRestaurant) -> Result<String, OrderError> {
        debug!("Sending request");
        match restaurant.products.first() {
            None => {
                error!("Restaurant has no products");
                return Err(OrderError::Invalid(format!("{} has no products", restaurant.name)));
            }
            Some(product) if product.amount == 0 => {
                error!(product_id = product.product_id, "Product is out of stock");
                return Err(OrderError::OutOfStock(product.product_name.clone()));
            }
            Some(_) => {}
        }

        let id = format!("restaurant_{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.inner
            .compare_and_swap(None, restaurant.into_restaurant(id.clone()))
            .await?;

        info!(restaurant_id = %id, "Restaurant registered");
        Ok(id)
    }

    /// Sets the stock counter. Reaching zero switches the product off; a
    /// positive amount leaves `available` as it was.
    #[instrument(skip(self))]
    pub async fn restock(&self, restaurant_id: String, amount: u32) -> Result<Product, OrderError> {
        debug!("Sending request");
        let product = self
            .inner
            .perform_action(restaurant_id, RestaurantAction::Restock(amount))
            .await?;
        info!(amount = product.amount, available = product.available, "Stock set");
        Ok(product)
    }

    /// Switches the product on or off. Switching on a product with no stock
    /// is refused.
    #[instrument(skip(self))]
    pub async fn set_availability(&self, restaurant_id: String, available: bool) -> Result<Product, OrderError> {
        debug!("Sending request");
        let product = self
            .inner
            .perform_action(restaurant_id, RestaurantAction::SetAvailability(available))
            .await?;
        Ok(product)
    }

    pub async fn shutdown(&self) -> Result<(), OrderError> {
        debug!("Sending shutdown request");
        self.inner.shutdown().await.map_err(OrderError::from)
    }
}

#[async_trait]
impl CatalogStore for CatalogClient {
    #[instrument(skip(self))]
    async fn list_restaurants(&self) -> Result<Vec<Versioned<Restaurant>>, OrderError> {
        debug!("Sending request");
        self.inner.list().await.map_err(OrderError::from)
    }

    #[instrument(skip(self))]
    async fn get_restaurant(&self, restaurant_id: &str) -> Result<Option<Versioned<Restaurant>>, OrderError> {
        debug!("Sending request");
        self.inner
            .get(restaurant_id.to_string())
            .await
            .map_err(OrderError::from)
    }

    #[instrument(skip(self, restaurant), fields(restaurant_id = %restaurant.id))]
    async fn swap_restaurant(&self, expected_version: u64, restaurant: Restaurant) -> Result<u64, OrderError> {
        debug!("Sending request");
        self.inner
            .compare_and_swap(Some(expected_version), restaurant)
            .await
            .map_err(OrderError::from)
    }
}
