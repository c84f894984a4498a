//! Shared auth form schema and wire DTOs for the server/client boundary.
//!
//! This crate owns the payload shapes used by both `server` and `client`:
//! the login/signup form types with their validation rules, the identity
//! backend result payloads, and the action error envelope. Keeping them in
//! one place means the server's boundary extractors and the client's form
//! controllers can never drift apart on field names or rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// =============================================================================
// FORM PAYLOADS
// =============================================================================

/// The email/password pair submitted by the login form.
///
/// Constructed from form input and discarded once the action completes; the
/// pair is never persisted client-side.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Invalid Email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be minimum 6 characters"))]
    pub password: String,
}

/// The signup form payload. Exists only during validation and submission.
#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid Email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be minimum 6 characters"))]
    pub password: String,
    #[validate(length(min = 6, message = "Password must be minimum 6 characters"))]
    pub confirm_password: String,
}

impl Credentials {
    /// Run the schema rules, flattening failures to field-keyed messages.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] when any field violates its rule.
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

impl SignupRequest {
    /// Run the schema rules plus the cross-field password match.
    ///
    /// The match violation attaches to `confirm_password` specifically, not
    /// `password`, so inline rendering points at the field the user retypes.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] when any field violates its rule.
    pub fn check(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(e) => FieldErrors::from(e),
        };
        if self.password != self.confirm_password {
            errors.push("confirm_password", "Password doesn't match");
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// The credential pair forwarded to the identity backend once the
    /// confirmation field has served its purpose.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials { email: self.email.clone(), password: self.password.clone() }
    }
}

// =============================================================================
// FIELD ERRORS
// =============================================================================

/// Field-level validation failures keyed by field name.
///
/// `BTreeMap` keeps iteration order stable so rendered error lists do not
/// reshuffle between identical submissions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for a field; empty when the field is clean.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_owned()).or_default().push(message.to_owned());
    }

    /// Names of all fields carrying at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut flattened = Self::default();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map_or_else(|| failure.code.to_string(), ToString::to_string);
                flattened.push(field, &message);
            }
        }
        flattened
    }
}

// =============================================================================
// IDENTITY BACKEND PAYLOADS
// =============================================================================

/// Account identity as returned by the hosted backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    /// Set once the confirmation link has been followed.
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
}

/// An established session returned by password auth or code exchange.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Result payload of a registration call. While email confirmation is
/// pending the backend returns the provisional user only; `session` is
/// populated when confirmation is disabled upstream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignupData {
    pub user: AuthUser,
    #[serde(default)]
    pub session: Option<Session>,
}

// =============================================================================
// ACTION ERROR ENVELOPE
// =============================================================================

/// Error half of an action result: a single user-facing message, plus the
/// conflicting records for "already exists" responses.
#[derive(Clone, Debug, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ActionError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ActionError {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), data: None }
    }
}

/// JSON envelope action failures travel in: `{"error":{"message":...}}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ActionError,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
