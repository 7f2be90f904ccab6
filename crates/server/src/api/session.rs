//! Response helpers shared by the page handlers: redirects, the session
//! cookie, flash-carrying page bodies and the storage error response.

use std::fmt::Display;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Serialize;
use tracing::error;

use helpdesk_core::{FlashMessage, SESSION_COOKIE};

use crate::state::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A page view together with the flash messages consumed while rendering it.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    #[serde(flatten)]
    pub view: T,
    pub flashes: Vec<FlashMessage>,
}

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Log a storage failure and answer 500.
pub fn internal_error(err: impl Display) -> Response {
    error!("Request failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Session cookie handing `token` to the client.
pub fn session_cookie(token: String, max_age: time::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .secure(secure)
        .build()
}

/// Cookie removing the session cookie from the client.
pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), time::Duration::ZERO, secure);
    cookie.make_removal();
    cookie
}

/// Return the caller's live session token, opening an anonymous session if
/// it has none. The second value is the cookie to send when a session was
/// opened.
pub fn ensure_session(
    state: &AppState,
    token: Option<String>,
) -> Result<(String, Option<Cookie<'static>>), Response> {
    let sessions = state.sessions();

    if let Some(token) = token {
        if sessions.get(&token).map_err(internal_error)?.is_some() {
            return Ok((token, None));
        }
    }

    let token = sessions.create(None).map_err(internal_error)?;
    let cookie = new_session_cookie(state, token.clone());
    Ok((token, Some(cookie)))
}

/// Cookie for a session issued just now.
pub fn new_session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let auth = state.auth_config();
    session_cookie(
        token,
        time::Duration::minutes(i64::from(auth.session_ttl_minutes)),
        auth.cookie_secure,
    )
}

/// Consume the flash messages queued on the caller's session.
pub fn take_flashes(state: &AppState, token: &Option<String>) -> Result<Vec<FlashMessage>, Response> {
    match token {
        Some(token) => state.sessions().take_flashes(token).map_err(internal_error),
        None => Ok(Vec::new()),
    }
}

/// Queue a flash message; a missing session drops it.
pub fn push_flash(state: &AppState, token: &Option<String>, flash: FlashMessage) -> Result<(), Response> {
    match token {
        Some(token) => state.sessions().push_flash(token, flash).map_err(internal_error),
        None => Ok(()),
    }
}
