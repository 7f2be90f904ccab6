//! Ticket storage trait and types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::ticket::{Ticket, TicketStatus};

/// Error type for ticket operations.
#[derive(Debug, Error)]
pub enum TicketError {
    /// The requested status change would move backwards or off the lifecycle.
    #[error("Cannot move ticket from {from} to {to}")]
    InvalidTransition { from: TicketStatus, to: TicketStatus },

    /// Another ticket already holds the generated identifier.
    #[error("Ticket id already exists: {0}")]
    DuplicateId(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Request to create a new ticket. The store assigns the identifier.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub user_id: String,
    pub equipment: String,
    pub model: String,
    pub serial: String,
    pub owner: String,
    pub short_description: String,
    pub detailed_description: String,
    /// Creation time; the raised date is its UTC calendar day.
    pub created_at: DateTime<Utc>,
}

/// Filter for querying tickets.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    /// Filter by owning user.
    pub user_id: Option<String>,
    /// Filter by exact stored status string.
    pub status: Option<String>,
}

impl TicketFilter {
    /// Create a new filter with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by owner.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Filter by status.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Trait for ticket storage backends.
pub trait TicketStore: Send + Sync {
    /// Create a new pending ticket with the owner's next sequential identifier.
    ///
    /// Allocating the number and inserting the row happen atomically.
    fn create(&self, request: NewTicket) -> Result<Ticket, TicketError>;

    /// Get a ticket by ID.
    fn get(&self, id: &str) -> Result<Option<Ticket>, TicketError>;

    /// List tickets matching the filter, in insertion order.
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError>;

    /// Count tickets matching the filter.
    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError>;

    /// Move the ticket owned by `user_id` from `from` to `to` in a single
    /// conditional update.
    ///
    /// Returns `Ok(false)` when no ticket matches id, owner and current status.
    fn transition_status(
        &self,
        id: &str,
        user_id: &str,
        from: &TicketStatus,
        to: &TicketStatus,
    ) -> Result<bool, TicketError>;
}
