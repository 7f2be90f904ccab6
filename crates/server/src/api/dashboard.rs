use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::middleware::{AuthUser, SessionToken};
use super::session::{internal_error, take_flashes, Page};
use crate::state::AppState;

/// Query parameters for the dashboard
#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    /// Status to show, or `all`
    pub status: Option<String>,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    SessionToken(token): SessionToken,
    Query(params): Query<DashboardParams>,
) -> Response {
    let view = match state
        .service()
        .dashboard(&user_id, params.status.as_deref())
    {
        Ok(view) => view,
        Err(e) => return internal_error(e),
    };
    let flashes = match take_flashes(&state, &token) {
        Ok(flashes) => flashes,
        Err(response) => return response,
    };

    Json(Page { view, flashes }).into_response()
}
