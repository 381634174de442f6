//! Session flows against the managed backend: identity, live sync and
//! listing submission.

pub mod identity;
pub mod live_sync;
pub mod submission;

pub use identity::{apply_identity_change, bootstrap};
pub use live_sync::{decode_snapshot, LiveSync};
pub use submission::submit_listing;
