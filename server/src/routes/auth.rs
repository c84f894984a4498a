//! Auth routes — login/signup actions, confirmation callback, session cookie.
//!
//! ERROR HANDLING
//! ==============
//! Action failures leave the body in the `{"error":{"message":...}}`
//! envelope with the provider's wording untouched; only directory failures
//! are masked behind a generic message (and logged) since their detail is
//! not the user's business.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use schema::{ActionError, Credentials, ErrorBody, SignupRequest};

use crate::services::accounts::PgAccounts;
use crate::services::auth::{self as auth_svc, AuthError};
use crate::services::identity::{IdentityClient, IdentityError, IdentityProvider};
use crate::state::AppState;

const COOKIE_NAME: &str = "session_token";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

/// Whether session cookies should carry the `Secure` flag: explicit
/// `COOKIE_SECURE` wins, else inferred from the site URL scheme.
pub(crate) fn cookie_secure(site_url: Option<&str>) -> bool {
    if let Some(value) = env_bool("COOKIE_SECURE") {
        return value;
    }
    site_url.map(|url| url.starts_with("https://")).unwrap_or(false)
}

fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Map an action failure to its HTTP response. Provider statuses pass
/// through so callers see exactly what the backend said.
pub(crate) fn error_response(error: &AuthError) -> Response {
    match error {
        AuthError::Invalid(fields) => {
            tracing::debug!(fields = ?fields.fields().collect::<Vec<_>>(), "signup payload failed validation");
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody { error: ActionError::message("Invalid data") }))
                .into_response()
        }
        AuthError::Conflict { records } => {
            let error = ActionError {
                message: "User already exists".to_owned(),
                data: serde_json::to_value(records).ok(),
            };
            (StatusCode::CONFLICT, Json(ErrorBody { error })).into_response()
        }
        AuthError::Backend(IdentityError::Provider { status, message }) => {
            let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(ErrorBody { error: ActionError::message(message.clone()) })).into_response()
        }
        AuthError::Backend(e) => {
            tracing::error!(error = %e, "identity backend unreachable");
            (StatusCode::BAD_GATEWAY, Json(ErrorBody { error: ActionError::message(e.to_string()) }))
                .into_response()
        }
        AuthError::Db(e) => {
            tracing::error!(error = %e, "account directory query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: ActionError::message("account lookup failed") }),
            )
                .into_response()
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login` — forward credentials to the identity backend and
/// set the session cookie on success. The client navigates to the
/// authenticated area itself; a failure body carries the provider's message.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Response {
    let Some(config) = &state.identity else {
        return (StatusCode::SERVICE_UNAVAILABLE, "identity backend not configured").into_response();
    };

    let identity = IdentityClient::new(config);
    match auth_svc::login_user(&identity, &credentials).await {
        Ok(session) => {
            let cookie = session_cookie(&session.access_token, cookie_secure(Some(config.site_url.as_str())));
            (jar.add(cookie), Json(session)).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// `POST /api/auth/signup` — existence pre-check, then registration with the
/// email-verification callback target. No cookie is set: the session only
/// exists after the confirmation link completes.
pub async fn signup(State(state): State<AppState>, Json(request): Json<SignupRequest>) -> Response {
    let Some(config) = &state.identity else {
        return (StatusCode::SERVICE_UNAVAILABLE, "identity backend not configured").into_response();
    };

    let accounts = PgAccounts::new(state.pool.clone());
    let identity = IdentityClient::new(config);
    match auth_svc::signup_user(&accounts, &identity, &config.site_url, &request).await {
        Ok(data) => {
            tracing::info!(email = %request.email, "signup accepted, verification handled upstream");
            Json(data).into_response()
        }
        Err(e) => error_response(&e),
    }
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    error_description: Option<String>,
}

/// `GET /auth/callback` — lands here from the verification email. A
/// successful code exchange sets the session cookie and continues into the
/// app; anything else bounces back to the signup page with the failure
/// description in the query so the page can present it.
pub async fn confirm_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackQuery>,
) -> Response {
    if let Some(description) = params.error_description.as_deref() {
        return Redirect::temporary(&signup_error_target(description)).into_response();
    }

    let Some(config) = &state.identity else {
        return (StatusCode::SERVICE_UNAVAILABLE, "identity backend not configured").into_response();
    };
    let Some(code) = params.code.as_deref() else {
        return Redirect::temporary(&signup_error_target("Missing confirmation code")).into_response();
    };

    let identity = IdentityClient::new(config);
    match identity.exchange_code(code).await {
        Ok(session) => {
            let cookie = session_cookie(&session.access_token, cookie_secure(Some(config.site_url.as_str())));
            (jar.add(cookie), Redirect::temporary("/dashboard")).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "confirmation code exchange failed");
            Redirect::temporary(&signup_error_target(&e.to_string())).into_response()
        }
    }
}

/// Signup-page redirect target carrying a link failure description.
pub(crate) fn signup_error_target(description: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(description.as_bytes()).collect();
    format!("/signup?error_description={encoded}")
}

/// `GET /api/auth/me` — resolve the session cookie to the current user.
pub async fn me(State(state): State<AppState>, jar: CookieJar) -> Response {
    let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
    if token.is_empty() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let Some(config) = &state.identity else {
        return (StatusCode::SERVICE_UNAVAILABLE, "identity backend not configured").into_response();
    };

    let identity = IdentityClient::new(config);
    match identity.fetch_user(token).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "session token rejected");
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

/// `POST /api/auth/logout` — clear the session cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let secure = cookie_secure(state.identity.as_deref().map(|c| c.site_url.as_str()));
    let jar = jar.add(expired_session_cookie(secure));
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
