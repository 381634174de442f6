//! Identity Toolkit REST client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::error::{BazaarError, BazaarResult};
use crate::traits::{AuthProvider, IdentityListeners, IdentityStream, UserId};

use super::read_json;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

/// Refresh the ID token this long before it expires.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct AuthSession {
    user: UserId,
    id_token: String,
    refresh_token: String,
    expires_at: Instant,
}

impl AuthSession {
    fn needs_refresh(&self) -> bool {
        Instant::now() + REFRESH_MARGIN >= self.expires_at
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
    #[serde(default)]
    local_id: Option<String>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<String>,
    user_id: String,
}

fn expiry(expires_in: Option<&str>) -> Instant {
    let secs = expires_in.and_then(|s| s.parse::<u64>().ok()).unwrap_or(3600);
    Instant::now() + Duration::from_secs(secs)
}

/// Auth provider backed by the Identity Toolkit REST API.
#[derive(Clone)]
pub struct FirebaseAuth {
    client: Client,
    config: ProviderConfig,
    session: Arc<RwLock<Option<AuthSession>>>,
    listeners: IdentityListeners,
}

impl FirebaseAuth {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            session: Arc::new(RwLock::new(None)),
            listeners: IdentityListeners::new(),
        }
    }

    pub fn project_id(&self) -> BazaarResult<&str> {
        self.config
            .project_id
            .as_deref()
            .ok_or_else(|| BazaarError::Config("provider config has no projectId".into()))
    }

    /// A valid ID token for the current session, refreshed when close to
    /// expiry. `None` while signed out.
    pub async fn id_token(&self) -> BazaarResult<Option<String>> {
        let Some(session) = self.session.read().clone() else {
            return Ok(None);
        };
        if !session.needs_refresh() {
            return Ok(Some(session.id_token));
        }

        debug!(user = %session.user, "Refreshing ID token");
        let url = format!("{SECURE_TOKEN_URL}?key={}", self.api_key()?);
        let response = self
            .client
            .post(url)
            .json(&json!({
                "grant_type": "refresh_token",
                "refresh_token": session.refresh_token,
            }))
            .send()
            .await?;
        match read_json::<RefreshResponse, _>(response, BazaarError::Auth).await {
            Ok(refreshed) => {
                let token = refreshed.id_token.clone();
                self.establish(AuthSession {
                    user: UserId::new(refreshed.user_id),
                    id_token: refreshed.id_token,
                    refresh_token: refreshed.refresh_token,
                    expires_at: expiry(refreshed.expires_in.as_deref()),
                });
                Ok(Some(token))
            }
            Err(e) => {
                warn!("Token refresh failed, ending session: {e}");
                *self.session.write() = None;
                self.listeners.publish(None);
                Err(e)
            }
        }
    }

    fn api_key(&self) -> BazaarResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| BazaarError::Config("provider config has no apiKey".into()))
    }

    async fn call<T: DeserializeOwned>(&self, endpoint: &str, body: &Value) -> BazaarResult<T> {
        let url = format!("{IDENTITY_TOOLKIT_URL}/{endpoint}?key={}", self.api_key()?);
        let response = self.client.post(url).json(body).send().await?;
        read_json(response, BazaarError::Auth).await
    }

    async fn lookup_user(&self, id_token: &str) -> BazaarResult<UserId> {
        let lookup: LookupResponse = self
            .call("accounts:lookup", &json!({ "idToken": id_token }))
            .await?;
        lookup
            .users
            .into_iter()
            .next()
            .map(|u| UserId::new(u.local_id))
            .ok_or_else(|| BazaarError::Auth("token lookup returned no user".into()))
    }

    /// Store the session and announce the identity if it changed.
    fn establish(&self, session: AuthSession) -> UserId {
        let user = session.user.clone();
        let changed = {
            let mut current = self.session.write();
            let changed = current.as_ref().map(|s| &s.user) != Some(&user);
            *current = Some(session);
            changed
        };
        if changed {
            self.listeners.publish(Some(user.clone()));
        }
        user
    }
}

#[async_trait]
impl AuthProvider for FirebaseAuth {
    async fn initialize(&self) -> BazaarResult<()> {
        self.api_key()?;
        let project = self.project_id()?;
        info!(project, "Auth provider configured");
        Ok(())
    }

    fn identity_changes(&self) -> IdentityStream {
        self.listeners.register()
    }

    async fn sign_in_with_custom_token(&self, token: &str) -> BazaarResult<UserId> {
        let response: SignInResponse = self
            .call(
                "accounts:signInWithCustomToken",
                &json!({ "token": token, "returnSecureToken": true }),
            )
            .await?;
        let user = match response.local_id {
            Some(id) => UserId::new(id),
            None => self.lookup_user(&response.id_token).await?,
        };
        info!(%user, "Signed in with custom token");
        Ok(self.establish(AuthSession {
            user,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_at: expiry(response.expires_in.as_deref()),
        }))
    }

    async fn sign_in_anonymously(&self) -> BazaarResult<UserId> {
        let response: SignInResponse = self
            .call("accounts:signUp", &json!({ "returnSecureToken": true }))
            .await?;
        let user = response
            .local_id
            .map(UserId::new)
            .ok_or_else(|| BazaarError::Auth("sign-up response has no localId".into()))?;
        info!(%user, "Signed in anonymously");
        Ok(self.establish(AuthSession {
            user,
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_at: expiry(response.expires_in.as_deref()),
        }))
    }
}
