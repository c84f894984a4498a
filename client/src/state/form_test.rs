use super::*;

fn filled_login() -> LoginController {
    let mut controller = LoginController::default();
    controller.set_email("user@example.com");
    controller.set_password("abc123");
    controller
}

fn filled_signup() -> SignupController {
    let mut controller = SignupController::default();
    controller.set_email("user@example.com");
    controller.set_password("abc123");
    controller.set_confirm_password("abc123");
    controller
}

// =============================================================================
// LoginController — validation and gating
// =============================================================================

#[test]
fn login_validates_on_every_change() {
    let mut controller = LoginController::default();
    controller.set_email("not-an-email");
    assert_eq!(controller.field_errors().get("email"), ["Invalid Email"]);
    assert!(!controller.can_submit());

    controller.set_email("user@example.com");
    controller.set_password("abc123");
    assert!(controller.field_errors().is_empty());
    assert!(controller.can_submit());
}

#[test]
fn login_invalid_submit_dispatches_nothing() {
    let mut controller = LoginController::default();
    controller.set_email("user@example.com");
    controller.set_password("abc");
    assert!(controller.begin_submit().is_none());
    assert_eq!(controller.field_errors().get("password"), ["Password must be minimum 6 characters"]);
    assert!(!controller.is_submitting());
}

#[test]
fn login_submit_disabled_while_in_flight() {
    let mut controller = filled_login();
    let payload = controller.begin_submit().expect("first submit should dispatch");
    assert_eq!(payload.email, "user@example.com");
    assert!(controller.is_submitting());
    assert_eq!(controller.flow_state(), FlowState::Submitting);

    // Identical resubmission while pending: the control is disabled.
    assert!(!controller.can_submit());
    assert!(controller.begin_submit().is_none());
}

#[test]
fn login_success_navigates() {
    let mut controller = filled_login();
    controller.begin_submit().expect("submit should dispatch");

    let outcome = controller.complete(Ok(()));

    assert_eq!(outcome, LoginOutcome::Navigate);
    assert!(controller.submit_error().is_none());
}

#[test]
fn login_failure_clears_fields_and_shows_message() {
    let mut controller = filled_login();
    controller.begin_submit().expect("submit should dispatch");

    let outcome = controller.complete(Err("Invalid login credentials".to_owned()));

    assert_eq!(outcome, LoginOutcome::Stay);
    assert_eq!(controller.email(), "");
    assert_eq!(controller.password(), "");
    assert_eq!(controller.submit_error(), Some("Invalid login credentials"));
    assert_eq!(controller.flow_state(), FlowState::Error("Invalid login credentials".to_owned()));
}

#[test]
fn login_field_change_dismisses_submit_error() {
    let mut controller = filled_login();
    controller.begin_submit().expect("submit should dispatch");
    controller.complete(Err("Invalid login credentials".to_owned()));

    controller.set_email("u");

    assert!(controller.submit_error().is_none());
    // The schema's own onChange validation still applies to the new value.
    assert_eq!(controller.field_errors().get("email"), ["Invalid Email"]);
}

// =============================================================================
// SignupController — optimistic confirmation
// =============================================================================

#[test]
fn signup_mismatch_blocks_dispatch_on_confirm_field() {
    let mut controller = SignupController::default();
    controller.set_email("user@example.com");
    controller.set_password("abc123");
    controller.set_confirm_password("xyz789");

    assert!(controller.begin_submit().is_none());
    assert_eq!(controller.field_errors().get("confirm_password"), ["Password doesn't match"]);
    assert!(controller.field_errors().get("password").is_empty());
    assert!(!controller.confirmation_pending());
}

#[test]
fn signup_dispatch_is_optimistically_confirmed() {
    let mut controller = filled_signup();

    let request = controller.begin_submit().expect("submit should dispatch");

    assert_eq!(request.email, "user@example.com");
    // Confirmation shows before any result has resolved.
    assert!(controller.confirmation_pending());
    assert!(controller.is_submitting());
    assert_eq!(controller.flow_state(), FlowState::ConfirmationPending);
    assert!(!controller.can_submit());
    assert!(controller.begin_submit().is_none());
}

#[test]
fn signup_success_keeps_confirmation_pending() {
    let mut controller = filled_signup();
    controller.begin_submit().expect("submit should dispatch");

    controller.complete(Ok(()));

    assert!(controller.confirmation_pending());
    assert!(!controller.is_submitting());
    assert_eq!(controller.flow_state(), FlowState::ConfirmationPending);
    // The panel stays up; the form never reopens on success.
    assert!(controller.begin_submit().is_none());
}

#[test]
fn signup_late_error_overrides_optimistic_state() {
    let mut controller = filled_signup();
    controller.begin_submit().expect("submit should dispatch");
    assert!(controller.confirmation_pending());

    controller.complete(Err("User already exists".to_owned()));

    assert!(!controller.confirmation_pending());
    assert_eq!(controller.email(), "");
    assert_eq!(controller.submit_error(), Some("User already exists"));
    assert_eq!(controller.flow_state(), FlowState::Error("User already exists".to_owned()));
}

#[test]
fn signup_field_change_dismisses_submit_error() {
    let mut controller = filled_signup();
    controller.begin_submit().expect("submit should dispatch");
    controller.complete(Err("User already exists".to_owned()));

    controller.set_email("other@example.com");

    assert!(controller.submit_error().is_none());
    assert_eq!(controller.flow_state(), FlowState::Idle);
}
