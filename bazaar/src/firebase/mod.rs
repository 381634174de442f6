//! Production adapters for the managed backend, spoken over its REST APIs.
//!
//! [`FirebaseAuth`] covers anonymous and custom-token sign-in through the
//! Identity Toolkit API. [`FirestoreStore`] lists and appends documents
//! through the Firestore REST API and emulates the live subscription by
//! polling, pushing a full snapshot whenever the collection changes.

pub mod auth;
pub mod firestore;
pub mod values;

pub use auth::FirebaseAuth;
pub use firestore::FirestoreStore;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{BazaarError, BazaarResult};

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

/// Human-readable message of a failed REST call.
fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => {
            format!("{} ({})", envelope.error.message, envelope.error.code)
        }
        _ if body.trim().is_empty() => format!("HTTP {status}"),
        _ => format!("HTTP {status}: {}", body.trim()),
    }
}

/// Decode a JSON response, turning non-success statuses into errors built
/// by `wrap`.
async fn read_json<T, F>(response: reqwest::Response, wrap: F) -> BazaarResult<T>
where
    T: DeserializeOwned,
    F: FnOnce(String) -> BazaarError,
{
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(wrap(describe_failure(status, &body)));
    }
    serde_json::from_str(&body)
        .map_err(|e| BazaarError::Serialization(format!("Unexpected response body: {e}")))
}
