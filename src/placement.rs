//! # Order placement
//!
//! Every placement follows the same path: resolve the target product in the
//! catalog, reserve stock in the ledger, then finish according to the kind of
//! request. The reservation is the only write to the catalog; every refusal
//! (`NotFound`, `OutOfStock`, `InsufficientStock`) is decided before it.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{CatalogReader, ResolvedProduct};
use crate::claim_code::ClaimCode;
use crate::domain::Order;
use crate::error::OrderError;
use crate::events::{AnalyticsEvent, EventSink};
use crate::orders::OrderLifecycle;
use crate::stock::{Reservation, StockLedger};

#[derive(Debug, Clone, PartialEq)]
pub enum PlacementRequest {
    /// Take `quantity` units of the product with `product_id`. Nothing is
    /// recorded in any user's history.
    Quantity { product_id: u64, quantity: u32 },
    /// Take one unit from the named restaurant and record a pending order
    /// for `user_id`. `product_name` and `price` are stored as given.
    Named {
        restaurant_name: String,
        product_name: String,
        price: Decimal,
        user_id: String,
    },
    /// Take one unit from the restaurant with `restaurant_id`.
    DecreaseStock { restaurant_id: String },
}

impl PlacementRequest {
    /// Units this request reserves.
    pub fn units(&self) -> u32 {
        match self {
            PlacementRequest::Quantity { quantity, .. } => *quantity,
            PlacementRequest::Named { .. } | PlacementRequest::DecreaseStock { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityOrderReceipt {
    pub code: ClaimCode,
    pub product_name: String,
    pub quantity: u32,
    pub restaurant_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedOrderReceipt {
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockDecrease {
    pub new_amount: u32,
    pub available: bool,
    pub product_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlacementReceipt {
    Quantity(QuantityOrderReceipt),
    Named(NamedOrderReceipt),
    StockDecrease(StockDecrease),
}

/// Composes the catalog reader, the stock ledger and the order lifecycle into
/// the placement flows.
#[derive(Clone)]
pub struct OrderPlacement {
    catalog: CatalogReader,
    ledger: StockLedger,
    lifecycle: OrderLifecycle,
    events: Arc<dyn EventSink>,
}

impl OrderPlacement {
    pub fn new(
        catalog: CatalogReader,
        ledger: StockLedger,
        lifecycle: OrderLifecycle,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            lifecycle,
            events,
        }
    }

    /// Dispatches `request` to the matching operation.
    pub async fn place(&self, request: PlacementRequest) -> Result<PlacementReceipt, OrderError> {
        match request {
            PlacementRequest::Quantity { product_id, quantity } => self
                .place_order(product_id, quantity)
                .await
                .map(PlacementReceipt::Quantity),
            PlacementRequest::Named {
                restaurant_name,
                product_name,
                price,
                user_id,
            } => self
                .place_order_by_restaurant_name(&restaurant_name, &product_name, price, &user_id)
                .await
                .map(PlacementReceipt::Named),
            PlacementRequest::DecreaseStock { restaurant_id } => self
                .decrease_stock(&restaurant_id)
                .await
                .map(PlacementReceipt::StockDecrease),
        }
    }

    /// Quantity order by product id.
    #[instrument(skip(self))]
    pub async fn place_order(&self, product_id: u64, quantity: u32) -> Result<QuantityOrderReceipt, OrderError> {
        let request = PlacementRequest::Quantity { product_id, quantity };
        let (resolved, reservation) = self.resolve_and_reserve(&request).await?;
        Ok(self.finish_quantity_order(resolved, reservation))
    }

    /// Single-unit order by restaurant name, recorded as pending for the user.
    #[instrument(skip(self))]
    pub async fn place_order_by_restaurant_name(
        &self,
        restaurant_name: &str,
        product_name: &str,
        price: Decimal,
        user_id: &str,
    ) -> Result<NamedOrderReceipt, OrderError> {
        let request = PlacementRequest::Named {
            restaurant_name: restaurant_name.to_string(),
            product_name: product_name.to_string(),
            price,
            user_id: user_id.to_string(),
        };
        let (_, reservation) = self.resolve_and_reserve(&request).await?;

        let order = Order::pending(ClaimCode::generate().into_string(), product_name, price);
        self.finish_named_order(user_id, order, reservation).await
    }

    /// Takes one unit from the restaurant's product.
    #[instrument(skip(self))]
    pub async fn decrease_stock(&self, restaurant_id: &str) -> Result<StockDecrease, OrderError> {
        let request = PlacementRequest::DecreaseStock {
            restaurant_id: restaurant_id.to_string(),
        };
        let (_, reservation) = self.resolve_and_reserve(&request).await?;
        Ok(self.finish_decrease(reservation))
    }

    /// The path every placement shares. Nothing is written unless the
    /// reservation succeeds.
    async fn resolve_and_reserve(
        &self,
        request: &PlacementRequest,
    ) -> Result<(ResolvedProduct, Reservation), OrderError> {
        let units = request.units();
        if units == 0 {
            error!("Rejecting placement of zero units");
            return Err(OrderError::InvalidQuantity(units));
        }

        let resolved = self.resolve(request).await?;
        let reservation = self.ledger.reserve(&resolved.restaurant_id, units).await?;
        Ok((resolved, reservation))
    }

    async fn resolve(&self, request: &PlacementRequest) -> Result<ResolvedProduct, OrderError> {
        debug!("Resolving placement target");
        match request {
            PlacementRequest::Quantity { product_id, .. } => self.catalog.resolve_product_by_id(*product_id).await,
            PlacementRequest::Named { restaurant_name, .. } => {
                self.catalog.resolve_product_by_name(restaurant_name).await
            }
            PlacementRequest::DecreaseStock { restaurant_id } => {
                self.catalog.resolve_by_restaurant_id(restaurant_id).await
            }
        }
    }

    fn finish_quantity_order(&self, resolved: ResolvedProduct, reservation: Reservation) -> QuantityOrderReceipt {
        let code = ClaimCode::generate();
        info!(code = %code, quantity = reservation.quantity, "Order placed");
        self.events.record(AnalyticsEvent::order_placed(
            code.as_str(),
            &reservation.product.product_name,
            reservation.quantity,
            None,
        ));

        QuantityOrderReceipt {
            code,
            product_name: reservation.product.product_name,
            quantity: reservation.quantity,
            restaurant_name: resolved.restaurant_name,
        }
    }

    /// Records the order under the user. If that fails the reserved unit is
    /// put back before the error is returned.
    async fn finish_named_order(
        &self,
        user_id: &str,
        order: Order,
        reservation: Reservation,
    ) -> Result<NamedOrderReceipt, OrderError> {
        let order_id = order.order_id.clone();
        let product_name = order.product_name.clone();

        if let Err(e) = self.lifecycle.record_order(user_id, order).await {
            error!(error = %e, "Recording order failed, releasing stock");
            if let Err(release_error) = self.ledger.release(&reservation).await {
                warn!(error = %release_error, "Stock could not be released");
            }
            return Err(e);
        }

        info!(order_id = %order_id, "Order placed");
        self.events.record(AnalyticsEvent::order_placed(
            &order_id,
            &product_name,
            reservation.quantity,
            Some(user_id),
        ));
        Ok(NamedOrderReceipt { order_id })
    }

    fn finish_decrease(&self, reservation: Reservation) -> StockDecrease {
        let product = reservation.product;
        info!(new_amount = product.amount, available = product.available, "Stock decreased");
        self.events.record(AnalyticsEvent::stock_decreased(
            &reservation.restaurant_id,
            product.amount,
            product.available,
        ));

        StockDecrease {
            new_amount: product.amount,
            available: product.available,
            product_name: product.product_name,
        }
    }
}
