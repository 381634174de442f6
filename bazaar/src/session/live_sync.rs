//! Live Collection Sync: keep the local mirror equal to the server collection.

use tracing::{error, info, warn};

use crate::board::{BoardState, IdentityState, Notification};
use crate::document::{CollectionPath, Document, StoreEvent};
use crate::marketplace::Listing;
use crate::traits::{DocumentStore, Subscription};

/// Owner of the single standing subscription to the listings collection.
///
/// Activation is a guarded predicate re-evaluated by [`LiveSync::reconcile`]
/// on every upstream change; subscribing and releasing are idempotent.
#[derive(Debug)]
pub struct LiveSync {
    path: CollectionPath,
    subscription: Option<Subscription>,
    /// Set after a subscription error; cleared once the activation
    /// conditions lapse, so there is no automatic retry.
    halted: bool,
}

impl LiveSync {
    pub fn new(path: CollectionPath) -> Self {
        Self {
            path,
            subscription: None,
            halted: false,
        }
    }

    pub fn path(&self) -> &CollectionPath {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// The sync runs only with a ready, connected and signed-in identity.
    pub fn should_activate(identity: &IdentityState) -> bool {
        identity.ready && identity.connected && identity.user_id.is_some()
    }

    /// Subscribe or release according to the current identity.
    pub fn reconcile<S: DocumentStore>(&mut self, store: &S, state: &mut BoardState) {
        if Self::should_activate(&state.identity) {
            if self.subscription.is_none() && !self.halted {
                info!(path = %self.path, "Subscribing to listings");
                self.subscription = Some(store.subscribe(&self.path));
                state.loading = true;
            }
            return;
        }

        self.release();
        self.halted = false;

        if state.identity.ready {
            state.loading = false;
            if state.identity.user_id.is_none() {
                warn!("No signed-in identity; listings are unavailable until sign-in");
            }
        }
    }

    /// Cancel the subscription, if any.
    pub fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            info!(path = %self.path, "Releasing listings subscription");
            subscription.cancel();
        }
    }

    /// Wait for the next store event.
    ///
    /// Pends forever while no subscription is active. `None` means the
    /// producer went away.
    pub async fn recv(&mut self) -> Option<StoreEvent> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.next().await,
            None => std::future::pending().await,
        }
    }

    /// Take an already-delivered store event without waiting.
    pub fn try_recv(&mut self) -> Option<StoreEvent> {
        self.subscription.as_mut().and_then(Subscription::try_next)
    }

    /// Apply one store event to the board.
    pub fn apply(&mut self, event: StoreEvent, state: &mut BoardState) {
        match event {
            StoreEvent::Snapshot(documents) => {
                let listings = decode_snapshot(&documents);
                info!(count = listings.len(), "Listings snapshot received");
                state.listings = listings;
                state.loading = false;
            }
            StoreEvent::Error(message) => {
                error!("Listings subscription failed: {message}");
                state
                    .notification
                    .raise(Notification::error(format!("Could not load services: {message}")));
                state.loading = false;
                self.halt();
            }
        }
    }

    /// The producer ended the subscription without an error.
    pub fn closed(&mut self, state: &mut BoardState) {
        if self.subscription.is_some() {
            warn!(path = %self.path, "Listings subscription closed by the store");
            state.loading = false;
            self.halt();
        }
    }

    fn halt(&mut self) {
        self.subscription = None;
        self.halted = true;
    }
}

/// Decode every document of a snapshot, skipping undecodable ones.
pub fn decode_snapshot(documents: &[Document]) -> Vec<Listing> {
    documents
        .iter()
        .filter_map(|doc| match Listing::from_document(doc) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!("Skipping listing {}: {e}", doc.id);
                None
            }
        })
        .collect()
}
