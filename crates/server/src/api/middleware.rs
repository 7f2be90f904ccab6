//! Session and metrics middleware for page routes.

use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts, OptionalFromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use helpdesk_core::{session_token, AuthError, AuthRequest, Identity};

use super::session::{found, internal_error};
use crate::metrics::{
    normalize_path, AUTH_FAILURES_TOTAL, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL,
    HTTP_REQUEST_DURATION,
};
use crate::state::AppState;

/// Metrics middleware that tracks HTTP request duration and counts.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Session token carried by the request, whether or not it is still valid.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

/// Session middleware that resolves the caller's identity.
///
/// The session cookie is handed to the configured authenticator. On success
/// the [`Identity`] is stored in the request extensions; an absent or stale
/// session simply leaves it out and each handler decides what to do. The raw
/// token is always stored as a [`SessionToken`] so handlers can reach the
/// session's flash messages.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_lowercase(), v.to_string()))
        })
        .collect();

    let source_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    let cookies: HashMap<String, String> = jar
        .iter()
        .map(|cookie| (cookie.name().to_string(), cookie.value_trimmed().to_string()))
        .collect();

    let auth_request = AuthRequest {
        headers,
        cookies,
        source_ip,
    };
    let token = session_token(&auth_request).map(str::to_string);

    match state.authenticator().authenticate(&auth_request).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
        }
        Err(AuthError::NotAuthenticated) => {
            AUTH_FAILURES_TOTAL
                .with_label_values(&["not_authenticated"])
                .inc();
        }
        Err(AuthError::InvalidCredentials(reason)) => {
            debug!(%source_ip, "Rejected session: {}", reason);
            AUTH_FAILURES_TOTAL
                .with_label_values(&["invalid_credentials"])
                .inc();
        }
        Err(e) => {
            error!("Session lookup failed: {}", e);
            AUTH_FAILURES_TOTAL
                .with_label_values(&["internal_error"])
                .inc();
            return internal_error(e);
        }
    }

    request.extensions_mut().insert(SessionToken(token));
    next.run(request).await
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<SessionToken>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Extractor for the authenticated user ID.
///
/// Requests without an identity are redirected to the entry route.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .map(|id| AuthUser(id.user_id.clone()))
            .ok_or_else(|| found("/"))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Identity>()
            .map(|id| AuthUser(id.user_id.clone())))
    }
}
