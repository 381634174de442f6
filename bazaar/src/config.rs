//! Configuration constants and environment-injected settings.
//!
//! Three values are injected at startup: the application namespace, the
//! provider connection blob and an optional one-time auth credential. Any of
//! them may be missing; the app then falls back to safe defaults and lets the
//! backend adapters report what they cannot do.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::document::CollectionPath;

/// Environment variable holding the application/tenant namespace.
pub const APP_ID_ENV: &str = "BAZAAR_APP_ID";

/// Environment variable holding the provider connection blob (JSON).
pub const PROVIDER_CONFIG_ENV: &str = "BAZAAR_FIREBASE_CONFIG";

/// Environment variable holding the optional one-time custom auth token.
pub const INITIAL_AUTH_TOKEN_ENV: &str = "BAZAAR_INITIAL_AUTH_TOKEN";

/// Environment variable overriding the REST subscription polling period.
pub const POLL_INTERVAL_ENV: &str = "BAZAAR_POLL_INTERVAL_SECS";

/// Namespace used when no application id is injected.
pub const DEFAULT_APP_ID: &str = "default-app-id";

/// Default polling period of the REST live subscription.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// Fixed segments of the listings collection path.
pub mod segments {
    /// Root collection scoping every application's data.
    pub const ARTIFACTS: &str = "artifacts";
    /// Publicly readable area under the namespace.
    pub const PUBLIC: &str = "public";
    /// Document grouping the public collections.
    pub const DATA: &str = "data";
    /// The listings collection itself.
    pub const SERVICES: &str = "services";
}

/// Connection settings for the managed backend.
///
/// Only `api_key` and `project_id` are needed by the REST adapters; the rest
/// is kept so the blob round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub auth_domain: Option<String>,
    pub project_id: Option<String>,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
}

impl ProviderConfig {
    /// Parse the JSON connection blob.
    ///
    /// A malformed blob is logged and replaced by the empty configuration.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring malformed {PROVIDER_CONFIG_ENV}: {e}");
                Self::default()
            }
        }
    }

    /// True when no connection setting was supplied at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Startup configuration of the marketplace board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BazaarConfig {
    pub app_id: String,
    pub provider: ProviderConfig,
    pub initial_auth_token: Option<String>,
    pub poll_interval: Duration,
}

impl Default for BazaarConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            provider: ProviderConfig::default(),
            initial_auth_token: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

impl BazaarConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_id = match non_empty(APP_ID_ENV) {
            Some(id) if id.contains('/') => {
                warn!(app_id = %id, "Ignoring {APP_ID_ENV} containing '/'; using {DEFAULT_APP_ID}");
                DEFAULT_APP_ID.to_string()
            }
            Some(id) => id,
            None => DEFAULT_APP_ID.to_string(),
        };
        let provider = non_empty(PROVIDER_CONFIG_ENV)
            .map(|raw| ProviderConfig::parse(&raw))
            .unwrap_or_default();
        let initial_auth_token = non_empty(INITIAL_AUTH_TOKEN_ENV);
        let poll_secs = non_empty(POLL_INTERVAL_ENV)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        Self {
            app_id,
            provider,
            initial_auth_token,
            poll_interval: Duration::from_secs(poll_secs),
        }
    }

    /// Path of the shared listings collection for this namespace.
    pub fn collection_path(&self) -> CollectionPath {
        CollectionPath::from_segments([
            segments::ARTIFACTS,
            self.app_id.as_str(),
            segments::PUBLIC,
            segments::DATA,
            segments::SERVICES,
        ])
    }
}
