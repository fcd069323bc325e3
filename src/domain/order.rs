use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// Format of [`Order::date`].
pub const ORDER_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Pending,
    Cancelled,
}

/// An order as recorded in a user's history.
///
/// `product_name` and `price` are copies taken when the order was placed, so
/// later catalog edits never rewrite past orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub state: OrderState,
    pub date: String,
}

impl Order {
    /// A freshly placed order, stamped with the current UTC time.
    pub fn pending(order_id: impl Into<String>, product_name: impl Into<String>, price: Decimal) -> Self {
        Self {
            order_id: order_id.into(),
            product_name: product_name.into(),
            price,
            state: OrderState::Pending,
            date: Utc::now().format(ORDER_DATE_FORMAT).to_string(),
        }
    }

    /// `pending -> cancelled`. Cancelled is terminal.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        match self.state {
            OrderState::Pending => {
                self.state = OrderState::Cancelled;
                Ok(())
            }
            OrderState::Cancelled => Err(OrderError::AlreadyCancelled(self.order_id.clone())),
        }
    }
}

/// A user's order history, stored as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOrders {
    pub user_id: String,
    pub orders: Vec<Order>,
}

impl UserOrders {
    pub fn new(user_id: impl Into<String>, first: Order) -> Self {
        Self {
            user_id: user_id.into(),
            orders: vec![first],
        }
    }

    /// First order with the given id.
    pub fn find_mut(&mut self, order_id: &str) -> Option<&mut Order> {
        self.orders.iter_mut().find(|order| order.order_id == order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_cancel_is_terminal() {
        let mut order = Order::pending("ABCD1234", "Margherita", Decimal::new(95, 1));
        assert_eq!(order.state, OrderState::Pending);

        order.cancel().unwrap();
        assert_eq!(order.state, OrderState::Cancelled);

        assert_eq!(order.cancel(), Err(OrderError::AlreadyCancelled("ABCD1234".to_string())));
        assert_eq!(order.state, OrderState::Cancelled);
    }

    #[test]
    fn test_date_uses_fixed_format() {
        let order = Order::pending("ABCD1234", "Margherita", Decimal::new(95, 1));
        assert!(NaiveDateTime::parse_from_str(&order.date, ORDER_DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_state_serializes_lowercase() {
        let order = Order::pending("ABCD1234", "Margherita", Decimal::new(95, 1));
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["state"], "pending");
        assert_eq!(json["price"], 9.5);
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut history = UserOrders::new("u1", Order::pending("DUP", "First", Decimal::ONE));
        history.orders.push(Order::pending("DUP", "Second", Decimal::TWO));

        let found = history.find_mut("DUP").unwrap();
        assert_eq!(found.product_name, "First");
        assert!(history.find_mut("NOPE").is_none());
    }
}
