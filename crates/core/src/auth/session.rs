//! Session cookie authentication.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};
use crate::session::SessionStore;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "helpdesk_session";

/// The session token carried by `request`, if any.
pub fn session_token(request: &AuthRequest) -> Option<&str> {
    request
        .cookies
        .get(SESSION_COOKIE)
        .map(String::as_str)
        .filter(|token| !token.is_empty())
}

/// Authenticator that resolves the session cookie against the session store.
///
/// A session only authenticates once an identity has been bound to it.
pub struct SessionAuthenticator {
    sessions: Arc<dyn SessionStore>,
}

impl SessionAuthenticator {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let token = session_token(request).ok_or(AuthError::NotAuthenticated)?;

        let session = self
            .sessions
            .get(token)
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?
            .ok_or_else(|| AuthError::InvalidCredentials("Unknown or expired session".to_string()))?;

        let user_id = session.user_id.ok_or(AuthError::NotAuthenticated)?;

        Ok(Identity::new(user_id, self.method_name()).with_claim(
            "expires_at",
            serde_json::Value::String(session.expires_at.to_rfc3339()),
        ))
    }

    fn method_name(&self) -> &'static str {
        "session"
    }
}
