//! Auth actions — credential submission and signup orchestration.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route handlers translate HTTP to these actions; the actions own the
//! backend conversation. Password auth is a single round trip with no local
//! retry. Signup re-validates the payload server-side, runs an advisory
//! existence pre-check, then registers with a verification callback target.
//!
//! TRADE-OFFS
//! ==========
//! The pre-check-then-register sequence is inherently racy: two signups for
//! the same email can interleave between the check and the registration
//! call. The check exists to answer the common case cheaply with a clear
//! conflict message; the backend's uniqueness constraint is the actual
//! guard, and its verbatim error is what a racing loser sees.

use schema::{Credentials, FieldErrors, Session, SignupData, SignupRequest};

use super::accounts::{AccountDirectory, AccountRecord};
use super::identity::{IdentityError, IdentityProvider};

/// Path under the site base URL that completes email verification.
pub const CONFIRM_CALLBACK_PATH: &str = "/auth/callback";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Payload failed server-side shape validation; no backend was contacted.
    #[error("Invalid data")]
    Invalid(FieldErrors),
    /// One or more account records already match the submitted email.
    #[error("User already exists")]
    Conflict { records: Vec<AccountRecord> },
    /// The identity backend rejected or failed the call.
    #[error(transparent)]
    Backend(#[from] IdentityError),
    /// The account directory query failed.
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Forward the credential pair to the identity backend's password endpoint.
///
/// On success a session exists and the caller is expected to persist the
/// token and navigate to the authenticated area. On failure the provider's
/// message is surfaced unchanged.
///
/// # Errors
///
/// Returns [`AuthError::Backend`] with the provider's verbatim message.
pub async fn login_user(
    identity: &dyn IdentityProvider,
    credentials: &Credentials,
) -> Result<Session, AuthError> {
    let session = identity
        .sign_in_with_password(&credentials.email, &credentials.password)
        .await?;
    Ok(session)
}

/// Register a new account.
///
/// Steps: re-validate the payload (client validation is not trusted), check
/// the account directory for an existing record, then call the registration
/// endpoint with the email-verification callback target. The backend's
/// result is returned verbatim; the verification email itself is entirely
/// the backend's concern.
///
/// # Errors
///
/// [`AuthError::Invalid`] when the shape check fails (no backend contact),
/// [`AuthError::Conflict`] when a record already matches the email (the
/// registration endpoint is never invoked), [`AuthError::Db`] /
/// [`AuthError::Backend`] when a collaborator fails.
pub async fn signup_user(
    accounts: &dyn AccountDirectory,
    identity: &dyn IdentityProvider,
    site_url: &str,
    request: &SignupRequest,
) -> Result<SignupData, AuthError> {
    if let Err(errors) = request.check() {
        return Err(AuthError::Invalid(errors));
    }

    let records = accounts.find_by_email(&request.email).await?;
    if !records.is_empty() {
        return Err(AuthError::Conflict { records });
    }

    let callback = confirm_callback_url(site_url);
    let data = identity
        .sign_up(&request.email, &request.password, &callback)
        .await?;
    Ok(data)
}

/// Build the email-verification callback target from the site base URL.
#[must_use]
pub fn confirm_callback_url(site_url: &str) -> String {
    format!("{}{CONFIRM_CALLBACK_PATH}", site_url.trim_end_matches('/'))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
