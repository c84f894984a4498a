//! Confirmation/error presenter for the signup page.
//!
//! Rendering is a pure function of three signals: the `error_description`
//! query parameter carried back by a failed confirmation link, the local
//! confirmation flag, and the form-level submit error. The presenter holds
//! no state of its own. A link error always outranks a pending
//! confirmation: a broken link means the pending story is stale.

#[cfg(test)]
#[path = "presenter_test.rs"]
mod presenter_test;

/// Title shown on the link-error panel.
pub const LINK_ERROR_TITLE: &str = "Invalid Link";
/// Title shown while a signup confirmation is pending.
pub const CONFIRMATION_TITLE: &str = "Check your email";
/// Body shown while a signup confirmation is pending.
pub const CONFIRMATION_BODY: &str = "An email confirmation has been sent";

/// What the signup page body should display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Display {
    /// The normal form, with an optional dismissible form-level message.
    Form { submit_error: Option<String> },
    /// The pending-confirmation panel.
    ConfirmationPending { title: &'static str, body: &'static str },
    /// The link-error panel replacing the normal form body.
    LinkError { title: &'static str, body: String },
}

/// Derive the display state from the page's signals.
#[must_use]
pub fn derive(link_error: Option<&str>, confirmation: bool, submit_error: Option<&str>) -> Display {
    if let Some(description) = link_error {
        return Display::LinkError { title: LINK_ERROR_TITLE, body: description.to_owned() };
    }
    if confirmation {
        return Display::ConfirmationPending { title: CONFIRMATION_TITLE, body: CONFIRMATION_BODY };
    }
    Display::Form { submit_error: submit_error.map(ToOwned::to_owned) }
}

/// Extract `error_description` from a raw page query string. Empty values
/// count as absent, matching how the page treats a bare parameter.
#[must_use]
pub fn link_error_from_query(query: &str) -> Option<String> {
    let trimmed = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(trimmed.as_bytes())
        .find(|(key, _)| key == "error_description")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
