use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors surfaced by the order core.
///
/// Only [`OrderError::Conflict`] is retried internally; everything else is
/// returned to the caller as soon as it is detected.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Product out of stock: {0}")]
    OutOfStock(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Order already cancelled: {0}")]
    AlreadyCancelled(String),
    #[error("Invalid catalog data: {0}")]
    Invalid(String),
    #[error("Concurrent modification: {0}")]
    Conflict(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl OrderError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, OrderError::Conflict(_))
    }
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::VersionConflict { .. } => OrderError::Conflict(e.to_string()),
            FrameworkError::Rejected(reason) => OrderError::Invalid(reason),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped | FrameworkError::Timeout(_) => {
                OrderError::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_framework_errors_map_to_order_kinds() {
        let conflict = FrameworkError::VersionConflict {
            id: "r1".to_string(),
            expected: Some(1),
            found: Some(2),
        };
        assert!(OrderError::from(conflict).is_retryable());

        let timeout = OrderError::from(FrameworkError::Timeout(Duration::from_millis(5)));
        assert!(matches!(timeout, OrderError::Unavailable(_)));
        assert!(!timeout.is_retryable());

        assert_eq!(
            OrderError::from(FrameworkError::NotFound("r9".to_string())),
            OrderError::NotFound("r9".to_string())
        );
    }
}
