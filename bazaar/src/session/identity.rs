//! Identity Bootstrap: connect to the auth provider and sign in once.

use tracing::{error, info};

use crate::board::{BoardState, Notification};
use crate::traits::{AuthProvider, IdentityStream, UserId};

/// Connect to the auth provider, register the identity listener and attempt
/// sign-in exactly once.
///
/// A one-time custom token is redeemed when present; otherwise an anonymous
/// session is created. Any failure raises one error notification and marks
/// the identity as ready so the rest of the board never stalls. Returns the
/// standing listener, or `None` when the provider could not be initialised.
pub async fn bootstrap<A: AuthProvider>(
    auth: &A,
    initial_token: Option<&str>,
    state: &mut BoardState,
) -> Option<IdentityStream> {
    if let Err(e) = auth.initialize().await {
        error!("Auth provider initialisation failed: {e}");
        state.identity.connected = false;
        state.identity.ready = true;
        state
            .notification
            .raise(Notification::error(format!("Could not connect to the marketplace: {e}")));
        return None;
    }
    state.identity.connected = true;

    let listener = auth.identity_changes();

    let outcome = match initial_token {
        Some(token) => {
            info!("Redeeming one-time auth token");
            auth.sign_in_with_custom_token(token).await
        }
        None => {
            info!("Signing in anonymously");
            auth.sign_in_anonymously().await
        }
    };

    match outcome {
        Ok(user) => info!(user = %user, "Signed in"),
        Err(e) => {
            error!("Sign-in failed: {e}");
            state.identity.ready = true;
            state
                .notification
                .raise(Notification::error(format!("Sign-in failed: {e}")));
        }
    }

    Some(listener)
}

/// Apply one identity-change notification.
pub fn apply_identity_change(state: &mut BoardState, identity: Option<UserId>) {
    match &identity {
        Some(user) => info!(user = %user, "Identity changed"),
        None => info!("Identity cleared"),
    }
    state.identity.user_id = identity;
    state.identity.ready = true;
}
