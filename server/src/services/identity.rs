//! Identity backend client — hosted password-auth and registration service.
//!
//! DESIGN
//! ======
//! This service never verifies a credential itself: it forwards the pair to
//! the hosted provider and surfaces the provider's messages verbatim, with
//! no translation layer. The client is constructed per handler invocation,
//! so no backend conversation state is shared across concurrent requests.
//!
//! The [`IdentityProvider`] trait fronts the HTTP client so service tests
//! can substitute capture mocks and assert which endpoints were (not)
//! called.

use serde::de::DeserializeOwned;

use schema::{AuthUser, Session, SignupData};

/// Identity backend configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Base URL of the hosted identity service.
    pub base_url: String,
    /// Project API key sent with every request.
    pub api_key: String,
    /// Public base URL of this deployment; used to build the
    /// email-verification callback target.
    pub site_url: String,
}

impl IdentityConfig {
    /// Load from `IDENTITY_URL`, `IDENTITY_API_KEY`, `SITE_URL`.
    /// Returns `None` if any are missing (auth endpoints will be disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("IDENTITY_URL").ok()?;
        let api_key = std::env::var("IDENTITY_API_KEY").ok()?;
        let site_url = std::env::var("SITE_URL").ok()?;
        Some(Self { base_url, api_key, site_url })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The request never produced a response (DNS, TLS, timeout).
    #[error("identity request failed: {0}")]
    Request(String),
    /// The provider answered non-success; `message` is its own wording.
    #[error("{message}")]
    Provider { status: u16, message: String },
    /// A success response body could not be deserialized.
    #[error("identity response parse failed: {0}")]
    Parse(String),
}

/// Operations this system depends on from the hosted identity service.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate an email/password pair, establishing a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    /// Register a new account. `email_redirect_to` is where the provider
    /// sends the browser after the verification link is followed; delivery
    /// of the verification email is entirely the provider's concern.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: &str,
    ) -> Result<SignupData, IdentityError>;

    /// Exchange a confirmation code carried by the callback redirect for a
    /// full session.
    async fn exchange_code(&self, code: &str) -> Result<Session, IdentityError>;

    /// Resolve an access token to its account identity.
    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, IdentityError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// HTTP client for the hosted identity service.
pub struct IdentityClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl IdentityClient {
    #[must_use]
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, IdentityError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| IdentityError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(IdentityError::Provider {
                status: status.as_u16(),
                message: provider_message(status.as_u16(), &body),
            });
        }
        serde_json::from_str(&body).map_err(|e| IdentityError::Parse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let resp = self
            .http
            .post(self.endpoint("/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        Self::read_json(resp).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        email_redirect_to: &str,
    ) -> Result<SignupData, IdentityError> {
        let resp = self
            .http
            .post(self.endpoint("/signup"))
            .query(&[("redirect_to", email_redirect_to)])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        Self::read_json(resp).await
    }

    async fn exchange_code(&self, code: &str) -> Result<Session, IdentityError> {
        let resp = self
            .http
            .post(self.endpoint("/token"))
            .query(&[("grant_type", "confirmation_code")])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "code": code }))
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        Self::read_json(resp).await
    }

    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, IdentityError> {
        let resp = self
            .http
            .get(self.endpoint("/user"))
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        Self::read_json(resp).await
    }
}

// =============================================================================
// ERROR BODY
// =============================================================================

#[derive(Debug, serde::Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extract the provider's own wording from an error body. The provider uses
/// `error_description` on auth endpoints and `msg` elsewhere; anything
/// unrecognized is passed through raw so nothing gets rewritten.
pub(crate) fn provider_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ProviderErrorBody>(body) {
        if let Some(message) = parsed.error_description.or(parsed.msg).or(parsed.error) {
            return message;
        }
    }
    if body.trim().is_empty() {
        format!("identity backend returned status {status}")
    } else {
        body.to_owned()
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
