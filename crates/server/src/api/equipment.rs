//! Equipment list and registration handlers.
//!
//! Unlike the other pages these answer unauthenticated callers with a
//! warning flash before sending them back to the entry route.

use axum::{
    extract::{rejection::FormRejection, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use helpdesk_core::{Equipment, EquipmentForm, FlashMessage, RegistrationError};

use super::middleware::{AuthUser, SessionToken};
use super::session::{ensure_session, found, internal_error, push_flash, take_flashes, Page};
use crate::metrics::EQUIPMENT_REGISTRATIONS_TOTAL;
use crate::state::AppState;

const LOGIN_REQUIRED: &str = "You must be logged in to view or add equipment.";
const EQUIPMENT_ADDED: &str = "Equipment added successfully!";

#[derive(Debug, Serialize)]
pub struct EquipmentView {
    pub equipment_list: Vec<Equipment>,
    /// Re-open the registration form (set by a rejected submission).
    pub show_form: bool,
}

pub async fn list_equipment(
    State(state): State<Arc<AppState>>,
    user: Option<AuthUser>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
) -> Response {
    let Some(AuthUser(user_id)) = user else {
        return login_required(&state, token, jar);
    };

    let equipment_list = match state.service().list_equipment(&user_id) {
        Ok(items) => items,
        Err(e) => return internal_error(e),
    };
    // An authenticated request always carries its token.
    let show_form = match token.as_deref().map(|t| state.sessions().take_show_form(t)) {
        Some(Ok(show)) => show,
        Some(Err(e)) => return internal_error(e),
        None => false,
    };
    let flashes = match take_flashes(&state, &token) {
        Ok(flashes) => flashes,
        Err(response) => return response,
    };

    Json(Page {
        view: EquipmentView {
            equipment_list,
            show_form,
        },
        flashes,
    })
    .into_response()
}

pub async fn register_equipment(
    State(state): State<Arc<AppState>>,
    user: Option<AuthUser>,
    SessionToken(token): SessionToken,
    jar: CookieJar,
    form: Result<Form<EquipmentForm>, FormRejection>,
) -> Response {
    let Some(AuthUser(user_id)) = user else {
        return login_required(&state, token, jar);
    };
    // Anonymous callers get the warning whatever the body.
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return rejection.into_response(),
    };

    let (flash, show_form, result) = match state.service().register_equipment(&user_id, form) {
        Ok(_) => (FlashMessage::success(EQUIPMENT_ADDED), false, "registered"),
        Err(RegistrationError::Storage(e)) => return internal_error(e),
        Err(e) => {
            let result = match e {
                RegistrationError::DuplicateSerial(_) => "duplicate_serial",
                _ => "missing_fields",
            };
            (FlashMessage::danger(e.to_string()), true, result)
        }
    };
    EQUIPMENT_REGISTRATIONS_TOTAL
        .with_label_values(&[result])
        .inc();

    if let Some(token) = token.as_deref() {
        if let Err(e) = state.sessions().set_show_form(token, show_form) {
            return internal_error(e);
        }
    }
    match push_flash(&state, &token, flash) {
        Ok(()) => found("/equipment"),
        Err(response) => response,
    }
}

/// Queue the login warning on the caller's session (opening one if needed)
/// and redirect to the entry route.
fn login_required(state: &AppState, token: Option<String>, jar: CookieJar) -> Response {
    warn!("Unauthenticated equipment request");

    let (token, cookie) = match ensure_session(state, token) {
        Ok(session) => session,
        Err(response) => return response,
    };
    if let Err(response) = push_flash(state, &Some(token), FlashMessage::warning(LOGIN_REQUIRED)) {
        return response;
    }

    match cookie {
        Some(cookie) => (jar.add(cookie), found("/")).into_response(),
        None => found("/"),
    }
}
