//! Auth provider abstraction.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::BazaarResult;

/// Opaque, session-scoped user identifier issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stream of identity-change notifications: `Some` while signed in.
pub type IdentityStream = mpsc::UnboundedReceiver<Option<UserId>>;

/// Abstraction over the managed authentication provider.
#[async_trait]
pub trait AuthProvider: Send + Sync + Clone + 'static {
    /// Connect to the provider and check that it is usable.
    async fn initialize(&self) -> BazaarResult<()>;

    /// Register a standing identity-change listener.
    ///
    /// The current identity (possibly absent) is delivered first, followed
    /// by every later change.
    fn identity_changes(&self) -> IdentityStream;

    /// Redeem a one-time custom token.
    async fn sign_in_with_custom_token(&self, token: &str) -> BazaarResult<UserId>;

    /// Create an anonymous session.
    async fn sign_in_anonymously(&self) -> BazaarResult<UserId>;
}

#[derive(Debug, Default)]
struct ListenerState {
    current: Option<UserId>,
    senders: Vec<mpsc::UnboundedSender<Option<UserId>>>,
}

/// Fan-out of identity changes to every registered listener.
///
/// Shared by the provider implementations so they all deliver the current
/// identity on registration and drop listeners whose receiver went away.
#[derive(Debug, Clone, Default)]
pub struct IdentityListeners {
    inner: Arc<Mutex<ListenerState>>,
}

impl IdentityListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it immediately receives the current identity.
    pub fn register(&self) -> IdentityStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut state = self.inner.lock();
        if tx.send(state.current.clone()).is_ok() {
            state.senders.push(tx);
        }
        rx
    }

    /// Record a new identity and notify every live listener.
    pub fn publish(&self, identity: Option<UserId>) {
        let mut state = self.inner.lock();
        state.current = identity.clone();
        state.senders.retain(|tx| tx.send(identity.clone()).is_ok());
    }

    /// The most recently published identity.
    pub fn current(&self) -> Option<UserId> {
        self.inner.lock().current.clone()
    }

    /// Number of listeners that are still attached.
    pub fn listener_count(&self) -> usize {
        let mut state = self.inner.lock();
        state.senders.retain(|tx| !tx.is_closed());
        state.senders.len()
    }
}
