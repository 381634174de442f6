pub mod board;
pub mod config;
pub mod document;
pub mod error;
pub mod firebase;
pub mod marketplace;
pub mod session;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use board::{
    render, Board, BoardEvent, BoardState, BrowseBody, IdentityState, Notification,
    NotificationKind, Screen, UiCommand, View,
};
pub use config::{BazaarConfig, ProviderConfig};
pub use document::{CollectionPath, Document, DocumentId, FieldValue, Fields, StoreEvent};
pub use error::{BazaarError, BazaarResult};
pub use firebase::{FirebaseAuth, FirestoreStore};
pub use marketplace::{FormField, Listing, ListingFilter, ListingForm};
pub use traits::{AuthProvider, DocumentStore, Subscription, TimeProvider, UserId};
