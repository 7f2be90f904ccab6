//! Entry, account and logout handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use helpdesk_core::User;

use super::middleware::{AuthUser, SessionToken};
use super::session::{
    expired_session_cookie, found, internal_error, new_session_cookie, take_flashes, Page,
};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AccountView {
    pub user: Option<User>,
}

/// Bind the configured identity to the caller's session and go to the dashboard.
pub async fn index(
    State(state): State<Arc<AppState>>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
) -> Response {
    let user_id = state.auth_config().demo_user_id.as_str();

    if let Some(token) = token {
        match state.sessions().assign_user(&token, user_id) {
            Ok(true) => {
                info!(user_id, "Session signed in");
                return found("/dashboard");
            }
            Ok(false) => {}
            Err(e) => return internal_error(e),
        }
    }

    match state.sessions().create(Some(user_id)) {
        Ok(token) => {
            info!(user_id, "Issued new session");
            let jar = jar.add(new_session_cookie(&state, token));
            (jar, found("/dashboard")).into_response()
        }
        Err(e) => internal_error(e),
    }
}

pub async fn account(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    SessionToken(token): SessionToken,
) -> Response {
    let user = match state.service().account(&user_id) {
        Ok(user) => user,
        Err(e) => return internal_error(e),
    };
    let flashes = match take_flashes(&state, &token) {
        Ok(flashes) => flashes,
        Err(response) => return response,
    };

    Json(Page {
        view: AccountView { user },
        flashes,
    })
    .into_response()
}

/// Drop the caller's session and clear the cookie.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
) -> Response {
    if let Some(token) = token {
        match state.sessions().delete(&token) {
            Ok(true) => info!("Session logged out"),
            Ok(false) => {}
            Err(e) => return internal_error(e),
        }
    }

    let jar = jar.add(expired_session_cookie(state.auth_config().cookie_secure));
    (jar, found("/")).into_response()
}
