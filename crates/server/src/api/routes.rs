use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{metrics_middleware, session_middleware};
use super::{account, dashboard, equipment, handlers, tickets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Pages resolve the session cookie before the handler runs
    let pages = Router::new()
        .route("/", get(account::index))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/verify/{ticket_id}", post(tickets::verify_ticket))
        .route("/account", get(account::account))
        .route(
            "/equipment",
            get(equipment::list_equipment).post(equipment::register_equipment),
        )
        .route("/ticket", get(tickets::ticket_form))
        .route("/submit_ticket", post(tickets::submit_ticket))
        .route("/logout", get(account::logout))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            session_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .merge(pages)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
