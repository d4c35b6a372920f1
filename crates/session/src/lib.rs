//! Client-side session lifecycle for the todo service: login, register,
//! logout and profile retrieval against the remote auth collaborator,
//! with the credential held in a single replaceable slot.

pub mod credential;
pub mod error;

use std::sync::RwLock;

use serde::Deserialize;

pub use credential::{CredentialStore, FileCredentialStore, MemoryCredentialStore,
    SessionCredential, UserProfile};
pub use error::SessionError;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "userData")]
    user_data: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

pub struct SessionManager {
    http: reqwest::Client,
    base_url: String,
    store: Box<dyn CredentialStore>,
    // Single slot replaced wholesale: a logout racing a login can
    // never leave a token without its profile or vice versa.
    slot: RwLock<Option<SessionCredential>>,
}

impl SessionManager {
    /// Builds a manager and restores any credential the store already
    /// holds from a previous session.
    pub fn new(base_url: impl Into<String>, store: Box<dyn CredentialStore>) -> Self {
        let restored = store.load();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            store,
            slot: RwLock::new(restored),
        }
    }

    /// True iff a credential is currently held. No freshness check;
    /// an expired token is only discovered when a protected call fails.
    pub fn is_authenticated(&self) -> bool {
        self.slot.read().unwrap().is_some()
    }

    pub fn credential(&self) -> Option<SessionCredential> {
        self.slot.read().unwrap().clone()
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<(), SessionError> {
        let resp = self
            .http
            .post(format!("{}/login", self.base_url))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "email": email.unwrap_or(""),
            }))
            .send()
            .await?;

        let body: RegisterResponse = resp.json().await?;
        if body.success {
            Ok(())
        } else {
            Err(SessionError::RegistrationFailed(
                body.message
                    .unwrap_or_else(|| "Registration failed".to_string()),
            ))
        }
    }

    /// On success the token/profile pair is persisted and installed as
    /// one replacement; any failure leaves the previous state intact.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, SessionError> {
        let resp = self
            .http
            .post(format!("{}/sign", self.base_url))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        let body: LoginResponse = resp.json().await?;
        if !(body.success && body.code == 200) {
            return Err(SessionError::AuthFailed(
                body.message.unwrap_or_else(|| "Login failed".to_string()),
            ));
        }

        let (token, user) = match (body.token, body.user_data) {
            (Some(token), Some(user)) => (token, user),
            _ => {
                return Err(SessionError::AuthFailed(
                    "Malformed login response".to_string(),
                ))
            }
        };

        let credential = SessionCredential {
            token,
            user: user.clone(),
        };
        self.store.save(&credential)?;
        *self.slot.write().unwrap() = Some(credential);

        Ok(user)
    }

    /// Best-effort remote revoke; local state is cleared no matter what
    /// the collaborator answers, and the caller never sees the failure.
    pub async fn logout(&self) {
        let token = self.credential().map(|c| c.token);

        if let Some(token) = token {
            let result = self
                .http
                .post(format!("{}/logout", self.base_url))
                .json(&serde_json::json!({ "token": token }))
                .send()
                .await;
            if let Err(e) = result {
                tracing::warn!(error = %e, "Remote logout failed; clearing local session anyway");
            }
        }

        *self.slot.write().unwrap() = None;
        self.store.clear();
    }

    /// Profile for the current session. Without a credential this is
    /// `None` and no request is made; a remote failure degrades to the
    /// cached profile instead of propagating.
    pub async fn fetch_profile(&self) -> Option<UserProfile> {
        let credential = self.credential()?;

        let result = self
            .http
            .get(format!("{}/user_info", self.base_url))
            .bearer_auth(&credential.token)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => match resp.json::<UserProfile>().await {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!(error = %e, "Malformed profile response; using cached profile");
                    Some(credential.user)
                }
            },
            Ok(resp) => {
                tracing::warn!(status = %resp.status(), "Profile fetch failed; using cached profile");
                Some(credential.user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch failed; using cached profile");
                Some(credential.user)
            }
        }
    }
}
