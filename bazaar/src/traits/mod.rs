//! Trait abstractions over the managed backend.
//!
//! The auth provider and the document store are external collaborators;
//! these traits let the session logic run against the REST adapters in
//! production and against in-memory mocks in tests.

pub mod auth;
pub mod store;
pub mod time;

pub use auth::{AuthProvider, IdentityListeners, IdentityStream, UserId};
pub use store::{DocumentStore, Subscription, SubscriptionSink};
pub use time::{SystemTimeProvider, TimeProvider};
