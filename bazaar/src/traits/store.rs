//! Document store abstraction with live subscriptions.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::document::{CollectionPath, DocumentId, Fields, StoreEvent};
use crate::error::BazaarResult;

/// Abstraction over the managed document database.
///
/// Only two operations are used: a live subscription to one collection and
/// appending a document to it.
#[async_trait]
pub trait DocumentStore: Send + Sync + Clone + 'static {
    /// Open a standing subscription to a collection.
    ///
    /// The full current contents arrive as the first event and again after
    /// every change. Failures are delivered as [`StoreEvent::Error`].
    fn subscribe(&self, path: &CollectionPath) -> Subscription;

    /// Append one document and return its store-assigned id.
    async fn append(&self, path: &CollectionPath, fields: Fields) -> BazaarResult<DocumentId>;
}

/// Cancellable handle of a live subscription.
///
/// Dropping or cancelling the handle severs it: the producer observes the
/// cancellation token and the receiver is gone, so no event is observed
/// after `cancel` returns.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::UnboundedReceiver<StoreEvent>,
    cancel: CancellationToken,
}

impl Subscription {
    pub fn new(events: mpsc::UnboundedReceiver<StoreEvent>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Create a connected pair: the producer side and the handle.
    pub fn channel() -> (SubscriptionSink, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        (
            SubscriptionSink {
                tx,
                cancel: cancel.clone(),
            },
            Self::new(rx, cancel),
        )
    }

    /// Wait for the next event; `None` once the producer has gone away.
    pub async fn next(&mut self) -> Option<StoreEvent> {
        self.events.recv().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_next(&mut self) -> Option<StoreEvent> {
        self.events.try_recv().ok()
    }

    /// Sever the subscription.
    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.events.close();
    }
}

/// Producer side of a [`Subscription`].
#[derive(Debug, Clone)]
pub struct SubscriptionSink {
    tx: mpsc::UnboundedSender<StoreEvent>,
    cancel: CancellationToken,
}

impl SubscriptionSink {
    /// Deliver an event; returns `false` once the subscription is severed.
    pub fn send(&self, event: StoreEvent) -> bool {
        !self.cancel.is_cancelled() && self.tx.send(event).is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    /// Resolves when the consumer cancels or drops the subscription.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }
}
