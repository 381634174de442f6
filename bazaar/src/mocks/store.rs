//! Mock document store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::document::{CollectionPath, Document, DocumentId, FieldValue, Fields, StoreEvent};
use crate::error::{BazaarError, BazaarResult};
use crate::traits::{
    DocumentStore, Subscription, SubscriptionSink, SystemTimeProvider, TimeProvider,
};

/// Types of failures that can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStoreFailure {
    /// Fail appends and new subscriptions.
    All,
    /// Fail only appends.
    Appends,
    /// New subscriptions deliver an error instead of a snapshot.
    Subscriptions,
}

struct Subscriber {
    path: CollectionPath,
    sink: SubscriptionSink,
}

struct MockStoreInner {
    /// Documents per collection path, in insertion order.
    collections: RwLock<HashMap<CollectionPath, Vec<Document>>>,
    subscribers: RwLock<Vec<Subscriber>>,
    next_id: AtomicU64,
    subscribe_calls: AtomicUsize,
    append_calls: AtomicUsize,
    fail_mode: RwLock<Option<MockStoreFailure>>,
    time: Arc<dyn TimeProvider>,
}

/// In-memory document store with live subscriptions.
///
/// Every change to a collection pushes a full snapshot to each live
/// subscriber of that collection, synchronously, so tests can observe the
/// echo with `try_next` right after the change.
#[derive(Clone)]
pub struct MockStore {
    inner: Arc<MockStoreInner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::with_time(SystemTimeProvider)
    }

    /// Create a store that stamps `createdAt` from the given clock.
    pub fn with_time(time: impl TimeProvider + 'static) -> Self {
        Self {
            inner: Arc::new(MockStoreInner {
                collections: RwLock::new(HashMap::new()),
                subscribers: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
                subscribe_calls: AtomicUsize::new(0),
                append_calls: AtomicUsize::new(0),
                fail_mode: RwLock::new(None),
                time: Arc::new(time),
            }),
        }
    }

    /// Set failure mode for testing error handling.
    pub fn set_fail_mode(&self, mode: Option<MockStoreFailure>) {
        *self.inner.fail_mode.write() = mode;
    }

    /// Insert a document out-of-band and notify subscribers.
    pub fn seed(&self, path: &CollectionPath, doc: Document) {
        self.inner
            .collections
            .write()
            .entry(path.clone())
            .or_default()
            .push(doc);
        self.broadcast(path);
    }

    /// Delete a document out-of-band and notify subscribers.
    pub fn remove(&self, path: &CollectionPath, id: &DocumentId) -> bool {
        let removed = {
            let mut collections = self.inner.collections.write();
            let Some(docs) = collections.get_mut(path) else {
                return false;
            };
            let before = docs.len();
            docs.retain(|d| &d.id != id);
            docs.len() != before
        };
        if removed {
            self.broadcast(path);
        }
        removed
    }

    /// Deliver an error to every live subscriber of `path` and end their
    /// subscriptions.
    pub fn fail_subscriptions(&self, path: &CollectionPath, message: &str) {
        let mut subscribers = self.inner.subscribers.write();
        subscribers.retain(|s| {
            if &s.path == path {
                s.sink.send(StoreEvent::Error(message.to_string()));
                false
            } else {
                true
            }
        });
    }

    /// Current contents of a collection.
    pub fn documents(&self, path: &CollectionPath) -> Vec<Document> {
        self.inner
            .collections
            .read()
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of subscriptions to `path` that have not been cancelled.
    pub fn active_subscriptions(&self, path: &CollectionPath) -> usize {
        let mut subscribers = self.inner.subscribers.write();
        subscribers.retain(|s| !s.sink.is_cancelled());
        subscribers.iter().filter(|s| &s.path == path).count()
    }

    pub fn subscribe_calls(&self) -> usize {
        self.inner.subscribe_calls.load(Ordering::SeqCst)
    }

    pub fn append_calls(&self) -> usize {
        self.inner.append_calls.load(Ordering::SeqCst)
    }

    fn fails(&self, modes: &[MockStoreFailure]) -> bool {
        self.inner
            .fail_mode
            .read()
            .is_some_and(|mode| modes.contains(&mode))
    }

    fn broadcast(&self, path: &CollectionPath) {
        let snapshot = self.documents(path);
        self.inner.subscribers.write().retain(|s| {
            if &s.path != path {
                return !s.sink.is_cancelled();
            }
            s.sink.send(StoreEvent::Snapshot(snapshot.clone()))
        });
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    fn subscribe(&self, path: &CollectionPath) -> Subscription {
        self.inner.subscribe_calls.fetch_add(1, Ordering::SeqCst);
        let (sink, subscription) = Subscription::channel();

        if self.fails(&[MockStoreFailure::All, MockStoreFailure::Subscriptions]) {
            sink.send(StoreEvent::Error("simulated subscription failure".into()));
            return subscription;
        }

        sink.send(StoreEvent::Snapshot(self.documents(path)));
        self.inner.subscribers.write().push(Subscriber {
            path: path.clone(),
            sink,
        });
        subscription
    }

    async fn append(&self, path: &CollectionPath, fields: Fields) -> BazaarResult<DocumentId> {
        self.inner.append_calls.fetch_add(1, Ordering::SeqCst);
        if self.fails(&[MockStoreFailure::All, MockStoreFailure::Appends]) {
            return Err(BazaarError::Store("simulated append failure".into()));
        }

        let now = self.inner.time.now_unix();
        let fields = fields
            .into_iter()
            .map(|(name, value)| match value {
                FieldValue::ServerTimestamp => (name, FieldValue::Timestamp(now)),
                other => (name, other),
            })
            .collect();
        let id = DocumentId::new(format!(
            "doc-{}",
            self.inner.next_id.fetch_add(1, Ordering::SeqCst)
        ));
        self.seed(path, Document::new(id.clone(), fields));
        Ok(id)
    }
}
