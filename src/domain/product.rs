use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The single sellable product a restaurant exposes.
///
/// `amount` is the stock counter. `available` must be `false` whenever
/// `amount` is zero; it may also be switched off by catalog management while
/// stock remains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: u64,
    pub product_name: String,
    pub amount: u32,
    pub available: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
}

impl Product {
    /// Creates a product that is available exactly when it has stock.
    pub fn new(
        product_id: u64,
        product_name: impl Into<String>,
        amount: u32,
        discount_price: Decimal,
        original_price: Decimal,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            amount,
            available: amount > 0,
            discount_price,
            original_price,
        }
    }

    /// A product can be sold from only while it has stock and is switched on.
    pub fn is_sellable(&self) -> bool {
        self.available && self.amount > 0
    }
}
