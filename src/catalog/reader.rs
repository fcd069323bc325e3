use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::actor_framework::Versioned;
use crate::domain::{Product, Restaurant};
use crate::error::OrderError;
use crate::store::CatalogStore;

/// A restaurant and its product as read from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProduct {
    pub restaurant_id: String,
    pub restaurant_name: String,
    pub product: Product,
}

impl ResolvedProduct {
    fn from_restaurant(restaurant: &Restaurant) -> Option<Self> {
        let product = restaurant.product()?.clone();
        Some(Self {
            restaurant_id: restaurant.id.clone(),
            restaurant_name: restaurant.name.clone(),
            product,
        })
    }
}

/// Read-only lookups against the catalog store.
#[derive(Clone)]
pub struct CatalogReader {
    store: Arc<dyn CatalogStore>,
}

impl CatalogReader {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Finds the restaurant whose name equals `restaurant_name` once both are
    /// stripped of whitespace and lowercased. No partial matching.
    #[instrument(skip(self))]
    pub async fn resolve_product_by_name(&self, restaurant_name: &str) -> Result<ResolvedProduct, OrderError> {
        debug!("Resolving product by restaurant name");
        let restaurants = self.store.list_restaurants().await?;

        let resolved = restaurants
            .iter()
            .map(|doc| &doc.value)
            .find(|restaurant| restaurant.matches_name(restaurant_name))
            .and_then(ResolvedProduct::from_restaurant);

        Self::found(resolved, || format!("restaurant {restaurant_name}"))
    }

    /// Finds the first restaurant whose product carries `product_id`.
    #[instrument(skip(self))]
    pub async fn resolve_product_by_id(&self, product_id: u64) -> Result<ResolvedProduct, OrderError> {
        debug!("Resolving product by id");
        let restaurants = self.store.list_restaurants().await?;

        let resolved = restaurants
            .iter()
            .map(|doc| &doc.value)
            .find(|restaurant| restaurant.product().is_some_and(|p| p.product_id == product_id))
            .and_then(ResolvedProduct::from_restaurant);

        Self::found(resolved, || format!("product {product_id}"))
    }

    #[instrument(skip(self))]
    pub async fn resolve_by_restaurant_id(&self, restaurant_id: &str) -> Result<ResolvedProduct, OrderError> {
        debug!("Resolving product by restaurant id");
        let resolved = self
            .store
            .get_restaurant(restaurant_id)
            .await?
            .and_then(|Versioned { value, .. }| ResolvedProduct::from_restaurant(&value));

        Self::found(resolved, || format!("restaurant {restaurant_id}"))
    }

    fn found(
        resolved: Option<ResolvedProduct>,
        describe: impl FnOnce() -> String,
    ) -> Result<ResolvedProduct, OrderError> {
        match resolved {
            Some(resolved) => {
                info!(
                    restaurant_id = %resolved.restaurant_id,
                    product_name = %resolved.product.product_name,
                    "Product resolved"
                );
                Ok(resolved)
            }
            None => {
                let what = describe();
                error!(target_name = %what, "Nothing in the catalog matches");
                Err(OrderError::NotFound(what))
            }
        }
    }
}
