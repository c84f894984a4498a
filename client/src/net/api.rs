//! REST API helpers for the auth endpoints.
//!
//! ERROR HANDLING
//! ==============
//! Callers get the server's `{"error":{"message":...}}` body mapped into
//! [`ApiError::Action`] with the message preserved verbatim; transport
//! failures are reported separately so the form controllers can render
//! either as the form-level message.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

use schema::{ActionError, Credentials, ErrorBody, Session, SignupData, SignupRequest};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with an action error.
    #[error("{0}")]
    Action(ActionError),
    /// The request never produced a usable response.
    #[error("request failed: {0}")]
    Transport(String),
}

fn login_endpoint(base_url: &str) -> String {
    format!("{}/api/auth/login", base_url.trim_end_matches('/'))
}

fn signup_endpoint(base_url: &str) -> String {
    format!("{}/api/auth/signup", base_url.trim_end_matches('/'))
}

/// Map a non-success response body to the action error it carries, falling
/// back to a status-line message when the envelope is missing.
fn action_error_from_body(status: u16, body: &str) -> ActionError {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| ActionError::message(format!("request failed: {status}")))
}

async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, ApiError> {
    let resp = reqwest::Client::new()
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = resp.status();
    let text = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
    if !status.is_success() {
        return Err(ApiError::Action(action_error_from_body(status.as_u16(), &text)));
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Transport(e.to_string()))
}

/// Submit login credentials. Returns the established session on success;
/// the session cookie is set by the server alongside the body.
///
/// # Errors
///
/// Returns [`ApiError`] with the server's message on rejection or a
/// transport description when the call never completed.
pub async fn login(base_url: &str, credentials: &Credentials) -> Result<Session, ApiError> {
    post_json(&login_endpoint(base_url), credentials).await
}

/// Dispatch a signup request. Resolution may lag well behind the page's
/// optimistic confirmation state; the caller feeds the result back into the
/// signup controller whenever it lands.
///
/// # Errors
///
/// Returns [`ApiError`] with the server's message on rejection or a
/// transport description when the call never completed.
pub async fn signup(base_url: &str, request: &SignupRequest) -> Result<SignupData, ApiError> {
    post_json(&signup_endpoint(base_url), request).await
}
