//! Listing Submission: validate the form and append one record.

use tracing::{error, info, warn};

use crate::board::{BoardState, Notification, View};
use crate::document::{CollectionPath, DocumentId};
use crate::error::{BazaarError, BazaarResult};
use crate::traits::{DocumentStore, UserId};

/// Message shown after a successful registration.
pub const SUCCESS_MESSAGE: &str = "Service registered successfully!";

/// Submit the registration form to the listings collection.
///
/// Missing prerequisites or empty fields are rejected before any store
/// call. On success the form is cleared and the board switches to the
/// browse view; on failure the form is left untouched for a retry. Either
/// way exactly one notification is raised. The new record shows up in the
/// mirror only once the subscription echoes it back.
pub async fn submit_listing<S: DocumentStore>(
    store: &S,
    path: &CollectionPath,
    state: &mut BoardState,
) -> BazaarResult<DocumentId> {
    let owner = match check_ready(state) {
        Ok(owner) => owner,
        Err(e) => {
            warn!("Submission rejected: {e}");
            state
                .notification
                .raise(Notification::error(format!("Cannot register a service right now: {e}")));
            return Err(e);
        }
    };

    if let Err(e) = state.form.validate() {
        warn!("Submission rejected: {e}");
        state.notification.raise(Notification::error(e.to_string()));
        return Err(e);
    }

    state.submitting = true;
    let fields = state.form.to_fields(&owner);
    let result = store.append(path, fields).await;
    state.submitting = false;

    match result {
        Ok(id) => {
            info!(id = %id, owner = %owner, "Listing registered");
            state.form.clear();
            state.notification.raise(Notification::success(SUCCESS_MESSAGE));
            state.view = View::Services;
            Ok(id)
        }
        Err(e) => {
            error!("Listing registration failed: {e}");
            state
                .notification
                .raise(Notification::error(format!("Could not register the service: {e}")));
            Err(e)
        }
    }
}

fn check_ready(state: &BoardState) -> BazaarResult<UserId> {
    if !state.identity.connected {
        return Err(BazaarError::Store(
            "the listings database is not available".into(),
        ));
    }
    state
        .identity
        .user_id
        .clone()
        .ok_or_else(|| BazaarError::Auth("not signed in".into()))
}
