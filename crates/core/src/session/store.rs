//! Session storage trait and types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Severity of a flash message, used by the presentation layer for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashLevel {
    Success,
    Danger,
    Warning,
}

/// A one-shot notification shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

impl FlashMessage {
    pub fn new(level: FlashLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, message)
    }
}

/// Server-side state attached to a session token.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Identity bound to the session; `None` until the entry route assigns one.
    pub user_id: Option<String>,
    /// Keep the equipment registration form open on the next render.
    pub show_form: bool,
    /// Messages waiting to be displayed.
    pub flashes: Vec<FlashMessage>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Hex-encoded SHA-256 of a session token, used as the storage key.
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Trait for session storage backends.
///
/// All operations take the raw client token. Operations on unknown or expired
/// tokens behave as if the session were empty.
pub trait SessionStore: Send + Sync {
    /// Start a new session, optionally bound to a user, and return its token.
    fn create(&self, user_id: Option<&str>) -> Result<String, SessionError>;

    /// Fetch a live session.
    fn get(&self, token: &str) -> Result<Option<Session>, SessionError>;

    /// Bind a user to an existing live session. Returns false if there is none.
    fn assign_user(&self, token: &str, user_id: &str) -> Result<bool, SessionError>;

    /// Queue a flash message for the next rendered page.
    fn push_flash(&self, token: &str, flash: FlashMessage) -> Result<(), SessionError>;

    /// Return and clear all queued flash messages.
    fn take_flashes(&self, token: &str) -> Result<Vec<FlashMessage>, SessionError>;

    fn set_show_form(&self, token: &str, show: bool) -> Result<(), SessionError>;

    /// Return and clear the show-form flag.
    fn take_show_form(&self, token: &str) -> Result<bool, SessionError>;

    /// End a session. Returns false if it did not exist.
    fn delete(&self, token: &str) -> Result<bool, SessionError>;

    /// Remove expired sessions, returning how many were removed.
    fn purge_expired(&self) -> Result<usize, SessionError>;
}
