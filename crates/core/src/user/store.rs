//! User storage trait and types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// An employee known to the helpdesk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Employee identifier, e.g. `EMP45678`.
    pub id: String,
    /// Free-form profile fields (name, department, ...).
    pub profile: Map<String, Value>,
}

impl User {
    pub fn new(id: impl Into<String>, profile: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            profile,
        }
    }
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid profile for user {id}: {reason}")]
    InvalidProfile { id: String, reason: String },
}

/// Trait for user storage backends.
pub trait UserStore: Send + Sync {
    /// Get a user by ID.
    fn get(&self, id: &str) -> Result<Option<User>, UserError>;

    /// Insert the user unless one with the same ID exists.
    /// Returns true if a row was written.
    fn insert_if_absent(&self, user: &User) -> Result<bool, UserError>;
}
