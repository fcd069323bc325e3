//! # Resource actor
//!
//! A generic single-writer document store. One [`ResourceActor`] task owns every
//! document of a given [`Entity`] type and applies requests strictly in message
//! order, so a read-validate-write performed inside the actor can never
//! interleave with another writer.
//!
//! Every stored document carries a version. Writers that read a document,
//! decide on a change and send it back use [`ResourceRequest::CompareAndSwap`]:
//! the write is applied only if the version is still the one they read.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Checked before any write is stored. A failing check leaves the stored
    /// document untouched.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Handle a custom domain-specific action against the stored document.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// A stored document together with its write version.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Version conflict on {id}: expected {expected:?}, found {found:?}")]
    VersionConflict {
        id: String,
        expected: Option<u64>,
        found: Option<u64>,
    },
    #[error("Rejected by entity: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Get {
        id: T::Id,
        respond_to: Response<Option<Versioned<T>>>,
    },
    List {
        respond_to: Response<Vec<Versioned<T>>>,
    },
    /// `expected_version: None` means the document must not exist yet.
    CompareAndSwap {
        expected_version: Option<u64>,
        value: T,
        respond_to: Response<u64>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, Versioned<T>>,
    insertion_order: Vec<T::Id>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(buffer_size: usize, timeout: Duration) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            insertion_order: Vec::new(),
        };
        (actor, ResourceClient::new(sender, timeout))
    }

    pub async fn run(mut self) {
        let entity = std::any::type_name::<T>();
        info!(entity, "ResourceActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.list()));
                }
                // A caller that timed out has already been told the write
                // failed, so its write must not land.
                ResourceRequest::CompareAndSwap { respond_to, .. } if respond_to.is_closed() => {
                    warn!(entity, "Dropping write abandoned by its caller");
                }
                ResourceRequest::CompareAndSwap {
                    expected_version,
                    value,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.compare_and_swap(expected_version, value));
                }
                ResourceRequest::Action { respond_to, .. } if respond_to.is_closed() => {
                    warn!(entity, "Dropping action abandoned by its caller");
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.apply_action(id, action));
                }
                ResourceRequest::Shutdown => {
                    info!(entity, "ResourceActor shutting down");
                    break;
                }
            }
        }

        info!(entity, "ResourceActor stopped");
    }

    fn list(&self) -> Vec<Versioned<T>> {
        self.insertion_order
            .iter()
            .filter_map(|id| self.store.get(id).cloned())
            .collect()
    }

    fn compare_and_swap(
        &mut self,
        expected_version: Option<u64>,
        value: T,
    ) -> Result<u64, FrameworkError> {
        let id = value.id().clone();
        let found = self.store.get(&id).map(|doc| doc.version);

        if found != expected_version {
            debug!(%id, ?expected_version, ?found, "Rejecting stale write");
            return Err(FrameworkError::VersionConflict {
                id: id.to_string(),
                expected: expected_version,
                found,
            });
        }

        value.validate().map_err(FrameworkError::Rejected)?;

        let version = found.map_or(1, |v| v + 1);
        if found.is_none() {
            self.insertion_order.push(id.clone());
        }
        self.store.insert(id, Versioned { version, value });
        Ok(version)
    }

    fn apply_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let Some(doc) = self.store.get_mut(&id) else {
            return Err(FrameworkError::NotFound(id.to_string()));
        };

        // Work on a copy so a failed action or a failed validation leaves the
        // stored document as it was.
        let mut candidate = doc.value.clone();
        let result = candidate.handle_action(action).map_err(FrameworkError::Rejected)?;
        if let Err(reason) = candidate.validate() {
            warn!(%id, %reason, "Action produced an invalid document");
            return Err(FrameworkError::Rejected(reason));
        }

        doc.value = candidate;
        doc.version += 1;
        Ok(result)
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

/// Handle to a [`ResourceActor`]. Every request is bounded by `timeout`.
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    timeout: Duration,
}

impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            timeout: self.timeout,
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>, timeout: Duration) -> Self {
        Self { sender, timeout }
    }

    async fn request<R, F>(&self, build: F) -> Result<R, FrameworkError>
    where
        R: Send,
        F: FnOnce(Response<R>) -> ResourceRequest<T> + Send,
    {
        let (respond_to, response) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(build(respond_to))
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            response.await.map_err(|_| FrameworkError::ActorDropped)?
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| FrameworkError::Timeout(self.timeout))?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<Versioned<T>>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<Versioned<T>>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn compare_and_swap(
        &self,
        expected_version: Option<u64>,
        value: T,
    ) -> Result<u64, FrameworkError> {
        self.request(|respond_to| ResourceRequest::CompareAndSwap {
            expected_version,
            value,
            respond_to,
        })
        .await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }

    pub async fn shutdown(&self) -> Result<(), FrameworkError> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }
}

// =============================================================================
// 5. TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        value: i64,
    }

    #[derive(Debug)]
    enum CounterAction {
        Add(i64),
    }

    impl Entity for Counter {
        type Id = String;
        type Action = CounterAction;
        type ActionResult = i64;

        fn id(&self) -> &String {
            &self.id
        }

        fn validate(&self) -> Result<(), String> {
            if self.value < 0 {
                return Err(format!("negative value {}", self.value));
            }
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<i64, String> {
            match action {
                CounterAction::Add(delta) => {
                    self.value += delta;
                    Ok(self.value)
                }
            }
        }
    }

    fn counter(id: &str, value: i64) -> Counter {
        Counter { id: id.to_string(), value }
    }

    fn spawn_actor() -> ResourceClient<Counter> {
        let (actor, client) = ResourceActor::new(10, Duration::from_secs(1));
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_compare_and_swap_bumps_version() {
        let client = spawn_actor();

        let v1 = client.compare_and_swap(None, counter("c1", 1)).await.unwrap();
        assert_eq!(v1, 1);

        let v2 = client.compare_and_swap(Some(1), counter("c1", 2)).await.unwrap();
        assert_eq!(v2, 2);

        let doc = client.get("c1".to_string()).await.unwrap().unwrap();
        assert_eq!(doc, Versioned { version: 2, value: counter("c1", 2) });
    }

    #[tokio::test]
    async fn test_stale_write_is_rejected() {
        let client = spawn_actor();
        client.compare_and_swap(None, counter("c1", 1)).await.unwrap();

        let stale = client.compare_and_swap(None, counter("c1", 5)).await;
        assert_eq!(
            stale,
            Err(FrameworkError::VersionConflict {
                id: "c1".to_string(),
                expected: None,
                found: Some(1),
            })
        );

        let doc = client.get("c1".to_string()).await.unwrap().unwrap();
        assert_eq!(doc.value.value, 1);
    }

    #[tokio::test]
    async fn test_invalid_write_leaves_document_untouched() {
        let client = spawn_actor();
        client.compare_and_swap(None, counter("c1", 3)).await.unwrap();

        let result = client.compare_and_swap(Some(1), counter("c1", -1)).await;
        assert!(matches!(result, Err(FrameworkError::Rejected(_))));

        let result = client.perform_action("c1".to_string(), CounterAction::Add(-10)).await;
        assert!(matches!(result, Err(FrameworkError::Rejected(_))));

        let doc = client.get("c1".to_string()).await.unwrap().unwrap();
        assert_eq!(doc.version, 1);
        assert_eq!(doc.value.value, 3);
    }

    #[tokio::test]
    async fn test_action_bumps_version_and_list_keeps_insertion_order() {
        let client = spawn_actor();
        client.compare_and_swap(None, counter("b", 0)).await.unwrap();
        client.compare_and_swap(None, counter("a", 0)).await.unwrap();

        let value = client.perform_action("a".to_string(), CounterAction::Add(4)).await.unwrap();
        assert_eq!(value, 4);

        let docs = client.list().await.unwrap();
        let ids: Vec<&str> = docs.iter().map(|doc| doc.value.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(docs[1].version, 2);

        let missing = client.perform_action("zzz".to_string(), CounterAction::Add(1)).await;
        assert_eq!(missing, Err(FrameworkError::NotFound("zzz".to_string())));
    }

    #[tokio::test]
    async fn test_request_times_out_when_actor_never_answers() {
        let (sender, _receiver) = mpsc::channel::<ResourceRequest<Counter>>(1);
        let client = ResourceClient::new(sender, Duration::from_millis(20));

        let result = client.get("c1".to_string()).await;
        assert_eq!(result, Err(FrameworkError::Timeout(Duration::from_millis(20))));
    }

    #[tokio::test]
    async fn test_timed_out_write_is_never_applied() {
        let (actor, client) = ResourceActor::<Counter>::new(10, Duration::from_millis(20));

        let result = client.compare_and_swap(None, counter("c1", 1)).await;
        assert_eq!(result, Err(FrameworkError::Timeout(Duration::from_millis(20))));

        tokio::spawn(actor.run());
        assert_eq!(client.get("c1".to_string()).await, Ok(None));
    }

    #[tokio::test]
    async fn test_abandoned_action_is_never_applied() {
        let client = spawn_actor();
        client.compare_and_swap(None, counter("c1", 1)).await.unwrap();

        let (respond_to, response) = oneshot::channel();
        drop(response);
        client
            .sender
            .send(ResourceRequest::Action {
                id: "c1".to_string(),
                action: CounterAction::Add(5),
                respond_to,
            })
            .await
            .unwrap();

        let doc = client.get("c1".to_string()).await.unwrap().unwrap();
        assert_eq!(doc, Versioned { version: 1, value: counter("c1", 1) });
    }

    #[tokio::test]
    async fn test_closed_actor_is_reported() {
        let client = spawn_actor();
        client.shutdown().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let result = client.list().await;
        assert_eq!(result, Err(FrameworkError::ActorClosed));
    }
}
