use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::actor_framework::Versioned;
use crate::domain::Product;
use crate::error::OrderError;
use crate::retry::{retry_on_conflict, RetryPolicy};
use crate::store::CatalogStore;

/// Outcome of a successful reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub restaurant_id: String,
    pub quantity: u32,
    /// The product as written by the reservation.
    pub product: Product,
    /// Whether this reservation is the one that switched the product off.
    pub emptied: bool,
    /// Restaurant document version written by the reservation.
    pub version: u64,
}

/// Checks a reservation against a product and returns the product as it must
/// be written. Never mutates `product`.
///
/// - out of stock or switched off: [`OrderError::OutOfStock`]
/// - fewer units than requested: [`OrderError::InsufficientStock`]
pub fn apply_reservation(product: &Product, quantity: u32) -> Result<Product, OrderError> {
    if quantity == 0 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    if !product.is_sellable() {
        return Err(OrderError::OutOfStock(product.product_name.clone()));
    }
    if product.amount < quantity {
        return Err(OrderError::InsufficientStock {
            requested: quantity,
            available: product.amount,
        });
    }

    let mut updated = product.clone();
    updated.amount -= quantity;
    if updated.amount == 0 {
        updated.available = false;
    }
    Ok(updated)
}

/// Decrements product stock with optimistic compare-and-swap on the
/// restaurant document. Lost races are re-read and retried under the policy.
#[derive(Clone)]
pub struct StockLedger {
    store: Arc<dyn CatalogStore>,
    retry: RetryPolicy,
}

impl StockLedger {
    pub fn new(store: Arc<dyn CatalogStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Takes `quantity` units from the restaurant's product.
    ///
    /// Either the whole decrement (and the availability switch when stock
    /// hits zero) is written in one swap, or nothing is.
    #[instrument(skip(self))]
    pub async fn reserve(&self, restaurant_id: &str, quantity: u32) -> Result<Reservation, OrderError> {
        if quantity == 0 {
            error!("Rejecting empty reservation");
            return Err(OrderError::InvalidQuantity(quantity));
        }

        let reservation = retry_on_conflict(&self.retry, || self.try_reserve(restaurant_id, quantity)).await?;
        info!(
            remaining_stock = reservation.product.amount,
            available = reservation.product.available,
            "Stock reserved successfully"
        );
        Ok(reservation)
    }

    async fn try_reserve(&self, restaurant_id: &str, quantity: u32) -> Result<Reservation, OrderError> {
        let Versioned { version, value: mut restaurant } = self
            .store
            .get_restaurant(restaurant_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("restaurant {restaurant_id}")))?;

        let product = restaurant
            .product_mut()
            .ok_or_else(|| OrderError::NotFound(format!("product of restaurant {restaurant_id}")))?;

        let updated = apply_reservation(product, quantity).inspect_err(|e| {
            error!(available = product.amount, requested = quantity, error = %e, "Reservation refused");
        })?;
        let emptied = product.available && !updated.available;
        *product = updated.clone();

        let version = self.store.swap_restaurant(version, restaurant).await?;

        Ok(Reservation {
            restaurant_id: restaurant_id.to_string(),
            quantity,
            product: updated,
            emptied,
            version,
        })
    }

    /// Undoes `reservation` when the step that followed it failed: puts the
    /// units back. The product is switched back on only if the reservation
    /// switched it off and nothing has written the restaurant since; any later
    /// write may be a catalog decision and its `available` flag is kept.
    #[instrument(skip(self, reservation), fields(restaurant_id = %reservation.restaurant_id, quantity = reservation.quantity))]
    pub async fn release(&self, reservation: &Reservation) -> Result<Product, OrderError> {
        let product = retry_on_conflict(&self.retry, || self.try_release(reservation)).await?;
        info!(restored_stock = product.amount, "Reservation released");
        Ok(product)
    }

    async fn try_release(&self, reservation: &Reservation) -> Result<Product, OrderError> {
        let restaurant_id = &reservation.restaurant_id;
        let Versioned { version, value: mut restaurant } = self
            .store
            .get_restaurant(restaurant_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("restaurant {restaurant_id}")))?;

        let product = restaurant
            .product_mut()
            .ok_or_else(|| OrderError::NotFound(format!("product of restaurant {restaurant_id}")))?;

        product.amount = product.amount.saturating_add(reservation.quantity);
        if reservation.emptied && version == reservation.version {
            product.available = true;
        }
        let restored = product.clone();

        self.store.swap_restaurant(version, restaurant).await?;
        Ok(restored)
    }
}
