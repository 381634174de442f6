//! Mock auth provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{BazaarError, BazaarResult};
use crate::traits::{AuthProvider, IdentityListeners, IdentityStream, UserId};

/// Types of failures that can be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAuthFailure {
    /// `initialize` fails.
    Initialize,
    /// Every sign-in attempt fails.
    SignIn,
}

#[derive(Debug, Default)]
struct MockAuthInner {
    listeners: IdentityListeners,
    /// Custom tokens that redeem to a fixed user.
    tokens: RwLock<HashMap<String, UserId>>,
    next_anonymous: AtomicU64,
    anonymous_sign_ins: AtomicUsize,
    token_sign_ins: AtomicUsize,
    fail_mode: RwLock<Option<MockAuthFailure>>,
}

/// In-memory auth provider.
///
/// Anonymous sign-in issues `anon-1`, `anon-2`, ...; custom tokens must be
/// registered up front with [`MockAuth::register_token`].
#[derive(Debug, Clone, Default)]
pub struct MockAuth {
    inner: Arc<MockAuthInner>,
}

impl MockAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set failure mode for testing error handling.
    pub fn set_fail_mode(&self, mode: Option<MockAuthFailure>) {
        *self.inner.fail_mode.write() = mode;
    }

    /// Make `token` redeemable for `user`.
    pub fn register_token(&self, token: &str, user: UserId) {
        self.inner.tokens.write().insert(token.to_string(), user);
    }

    /// Simulate the session ending out-of-band.
    pub fn sign_out(&self) {
        self.inner.listeners.publish(None);
    }

    /// Simulate the provider switching to another identity.
    pub fn switch_user(&self, user: UserId) {
        self.inner.listeners.publish(Some(user));
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.inner.listeners.current()
    }

    /// Number of anonymous sign-in attempts.
    pub fn anonymous_sign_ins(&self) -> usize {
        self.inner.anonymous_sign_ins.load(Ordering::SeqCst)
    }

    /// Number of custom-token sign-in attempts.
    pub fn token_sign_ins(&self) -> usize {
        self.inner.token_sign_ins.load(Ordering::SeqCst)
    }

    /// Number of identity listeners still attached.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.listener_count()
    }

    fn fails(&self, mode: MockAuthFailure) -> bool {
        *self.inner.fail_mode.read() == Some(mode)
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn initialize(&self) -> BazaarResult<()> {
        if self.fails(MockAuthFailure::Initialize) {
            return Err(BazaarError::Config("simulated initialisation failure".into()));
        }
        Ok(())
    }

    fn identity_changes(&self) -> IdentityStream {
        self.inner.listeners.register()
    }

    async fn sign_in_with_custom_token(&self, token: &str) -> BazaarResult<UserId> {
        self.inner.token_sign_ins.fetch_add(1, Ordering::SeqCst);
        if self.fails(MockAuthFailure::SignIn) {
            return Err(BazaarError::Auth("simulated sign-in failure".into()));
        }
        let user = self
            .inner
            .tokens
            .read()
            .get(token)
            .cloned()
            .ok_or_else(|| BazaarError::Auth("invalid custom token".into()))?;
        self.inner.listeners.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in_anonymously(&self) -> BazaarResult<UserId> {
        self.inner.anonymous_sign_ins.fetch_add(1, Ordering::SeqCst);
        if self.fails(MockAuthFailure::SignIn) {
            return Err(BazaarError::Auth("simulated sign-in failure".into()));
        }
        let n = self.inner.next_anonymous.fetch_add(1, Ordering::SeqCst) + 1;
        let user = UserId::new(format!("anon-{n}"));
        self.inner.listeners.publish(Some(user.clone()));
        Ok(user)
    }
}
