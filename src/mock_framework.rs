//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver. Then use helpers
//! like [`expect_get`] or [`expect_compare_and_swap`] to assert what was sent
//! and script the reply.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response, Versioned};

/// Creates a client whose requests land on a receiver the test controls
/// instead of a running actor.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
    timeout: Duration,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender, timeout), receiver)
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<Versioned<T>>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Response<Vec<Versioned<T>>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a CompareAndSwap request
pub async fn expect_compare_and_swap<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Option<u64>, T, Response<u64>)> {
    match receiver.recv().await {
        Some(ResourceRequest::CompareAndSwap {
            expected_version,
            value,
            respond_to,
        }) => Some((expected_version, value, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::domain::{Order, UserOrders};
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<UserOrders>(10, Duration::from_secs(1));

        let swap_task = tokio::spawn(async move {
            let orders = UserOrders::new("user-42", Order::pending("ABCD1234", "Margherita", Decimal::ONE));
            client.compare_and_swap(None, orders).await
        });

        let (expected_version, value, responder) = expect_compare_and_swap(&mut receiver)
            .await
            .expect("Expected CompareAndSwap request");
        assert_eq!(expected_version, None);
        assert_eq!(value.user_id, "user-42");
        responder
            .send(Err(FrameworkError::VersionConflict {
                id: "user-42".to_string(),
                expected: None,
                found: Some(1),
            }))
            .unwrap();

        let result = swap_task.await.unwrap();
        assert!(matches!(result, Err(FrameworkError::VersionConflict { .. })));
    }
}
