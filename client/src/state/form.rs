//! Form controllers for the login and signup pages.
//!
//! DESIGN
//! ======
//! Both flows share one shape: idle, validating on every field change,
//! submitting, then success, field errors, or a form-level submit error.
//! The controllers are plain state machines: `begin_submit` hands the shell
//! a payload to dispatch, and the shell feeds the resolved result back
//! through `complete`. Signup advances to confirmation-pending the moment
//! the dispatch starts; a result that lands later can retroactively
//! override that optimistic state.
//!
//! No in-flight call is ever cancelled. A second submission is prevented
//! only by the submit gate staying closed while one is pending.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use schema::{Credentials, FieldErrors, SignupRequest};

/// Visible submission state derived by the controllers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Submitting,
    ConfirmationPending,
    Error(String),
}

/// What the page should do after a login attempt resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Hand off to the authenticated area.
    Navigate,
    /// Stay on the page; the form was cleared and the message is shown.
    Stay,
}

// =============================================================================
// LOGIN
// =============================================================================

/// Drives the login form: schema validation on change, submit gating, and
/// the post-resolution transition.
#[derive(Debug, Default)]
pub struct LoginController {
    email: String,
    password: String,
    field_errors: FieldErrors,
    submit_error: Option<String>,
    submitting: bool,
}

impl LoginController {
    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_owned();
        self.field_changed();
    }

    pub fn set_password(&mut self, value: &str) {
        self.password = value.to_owned();
        self.field_changed();
    }

    fn field_changed(&mut self) {
        // Any edit while a submit error is shown dismisses it.
        self.submit_error = None;
        self.field_errors = match self.credentials().check() {
            Ok(()) => FieldErrors::default(),
            Err(errors) => errors,
        };
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials { email: self.email.clone(), password: self.password.clone() }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.field_errors.is_empty()
    }

    /// Begin a submission. Returns the payload to dispatch, or `None` when
    /// validation fails or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.submitting {
            return None;
        }
        let credentials = self.credentials();
        if let Err(errors) = credentials.check() {
            self.field_errors = errors;
            return None;
        }
        self.submitting = true;
        Some(credentials)
    }

    /// Apply the resolved login result. Success hands off navigation;
    /// failure clears the fields and shows the message in their place.
    pub fn complete(&mut self, result: Result<(), String>) -> LoginOutcome {
        self.submitting = false;
        match result {
            Ok(()) => LoginOutcome::Navigate,
            Err(message) => {
                self.reset_fields();
                self.submit_error = Some(message);
                LoginOutcome::Stay
            }
        }
    }

    fn reset_fields(&mut self) {
        self.email.clear();
        self.password.clear();
        self.field_errors = FieldErrors::default();
    }

    #[must_use]
    pub fn flow_state(&self) -> FlowState {
        if self.submitting {
            FlowState::Submitting
        } else if let Some(message) = &self.submit_error {
            FlowState::Error(message.clone())
        } else {
            FlowState::Idle
        }
    }
}

// =============================================================================
// SIGNUP
// =============================================================================

/// Drives the signup form. Unlike login, the confirmation-pending
/// presentation appears optimistically at dispatch time; only a later error
/// result takes it back down.
#[derive(Debug, Default)]
pub struct SignupController {
    email: String,
    password: String,
    confirm_password: String,
    field_errors: FieldErrors,
    submit_error: Option<String>,
    submitting: bool,
    confirmation: bool,
}

impl SignupController {
    pub fn set_email(&mut self, value: &str) {
        self.email = value.to_owned();
        self.field_changed();
    }

    pub fn set_password(&mut self, value: &str) {
        self.password = value.to_owned();
        self.field_changed();
    }

    pub fn set_confirm_password(&mut self, value: &str) {
        self.confirm_password = value.to_owned();
        self.field_changed();
    }

    fn field_changed(&mut self) {
        self.submit_error = None;
        self.field_errors = match self.request().check() {
            Ok(()) => FieldErrors::default(),
            Err(errors) => errors,
        };
    }

    #[must_use]
    pub fn request(&self) -> SignupRequest {
        SignupRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the signup dispatch has been initiated and not overridden by
    /// a failure result.
    #[must_use]
    pub fn confirmation_pending(&self) -> bool {
        self.confirmation
    }

    /// Whether the submit control should be enabled. Once the confirmation
    /// panel is up the control is gone entirely.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.confirmation && self.field_errors.is_empty()
    }

    /// Begin a submission. On a valid payload this also advances the
    /// presentation to confirmation-pending, regardless of when (or
    /// whether) the dispatch resolves.
    pub fn begin_submit(&mut self) -> Option<SignupRequest> {
        if self.submitting || self.confirmation {
            return None;
        }
        let request = self.request();
        if let Err(errors) = request.check() {
            self.field_errors = errors;
            return None;
        }
        self.submitting = true;
        self.confirmation = true;
        Some(request)
    }

    /// Apply the resolved signup result. Success leaves the optimistic
    /// confirmation in place; an error overrides it, resetting the form and
    /// showing the message instead.
    pub fn complete(&mut self, result: Result<(), String>) {
        self.submitting = false;
        if let Err(message) = result {
            self.confirmation = false;
            self.reset_fields();
            self.submit_error = Some(message);
        }
    }

    fn reset_fields(&mut self) {
        self.email.clear();
        self.password.clear();
        self.confirm_password.clear();
        self.field_errors = FieldErrors::default();
    }

    #[must_use]
    pub fn flow_state(&self) -> FlowState {
        if let Some(message) = &self.submit_error {
            FlowState::Error(message.clone())
        } else if self.confirmation {
            FlowState::ConfirmationPending
        } else if self.submitting {
            FlowState::Submitting
        } else {
            FlowState::Idle
        }
    }
}
