//! Ticket page handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use std::sync::Arc;

use helpdesk_core::{FlashMessage, TicketSubmission};

use super::middleware::{AuthUser, SessionToken};
use super::session::{found, internal_error, push_flash, take_flashes, Page};
use crate::metrics::{TICKETS_CREATED_TOTAL, TICKET_VERIFICATIONS_TOTAL};
use crate::state::AppState;

const TICKET_SUBMITTED: &str = "Ticket submitted successfully!";

/// Close a resolved ticket. The response is the same whether or not anything changed.
pub async fn verify_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(ticket_id): Path<String>,
) -> Response {
    match state.service().verify_ticket(&user_id, &ticket_id) {
        Ok(closed) => {
            let result = if closed { "closed" } else { "noop" };
            TICKET_VERIFICATIONS_TOTAL.with_label_values(&[result]).inc();
            found("/dashboard")
        }
        Err(e) => internal_error(e),
    }
}

/// Equipment options and existing tickets for the submission page.
pub async fn ticket_form(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    SessionToken(token): SessionToken,
) -> Response {
    let view = match state.service().ticket_form(&user_id) {
        Ok(view) => view,
        Err(e) => return internal_error(e),
    };
    let flashes = match take_flashes(&state, &token) {
        Ok(flashes) => flashes,
        Err(response) => return response,
    };

    Json(Page { view, flashes }).into_response()
}

pub async fn submit_ticket(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    SessionToken(token): SessionToken,
    Form(submission): Form<TicketSubmission>,
) -> Response {
    if let Err(e) = state.service().submit_ticket(&user_id, submission) {
        return internal_error(e);
    }
    TICKETS_CREATED_TOTAL.inc();

    match push_flash(&state, &token, FlashMessage::success(TICKET_SUBMITTED)) {
        Ok(()) => found("/dashboard"),
        Err(response) => response,
    }
}
