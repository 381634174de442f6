//! Mock implementations for testing.
//!
//! In-memory stand-ins for the managed backend, with failure injection, so
//! the session flows can be exercised without network access.

pub mod auth;
pub mod store;
pub mod time;

pub use auth::{MockAuth, MockAuthFailure};
pub use store::{MockStore, MockStoreFailure};
pub use time::MockTime;
