//! Core ticket data types.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rank given to statuses outside the known lifecycle; sorts them last.
pub const UNKNOWN_STATUS_RANK: u8 = 99;

/// Lifecycle status of a ticket.
///
/// Stored and serialized as the lowercase display string (`"in progress"`
/// contains a space). Values outside the lifecycle are kept verbatim in
/// [`TicketStatus::Other`] so records written by other tools survive a
/// read/write cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    /// Filed, waiting for an administrator.
    Pending,
    /// An administrator is working on it.
    InProgress,
    /// An administrator considers it fixed; the owner may verify it.
    Resolved,
    /// Verified by the owner. Terminal.
    Closed,
    /// Any other stored value.
    Other(String),
}

impl TicketStatus {
    /// Parse a status string, ignoring ASCII case for the known values.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "pending" => TicketStatus::Pending,
            "in progress" => TicketStatus::InProgress,
            "resolved" => TicketStatus::Resolved,
            "closed" => TicketStatus::Closed,
            _ => TicketStatus::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Pending => "pending",
            TicketStatus::InProgress => "in progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
            TicketStatus::Other(raw) => raw,
        }
    }

    /// Sort rank used by the dashboard.
    pub fn rank(&self) -> u8 {
        match self {
            TicketStatus::Pending => 1,
            TicketStatus::InProgress => 2,
            TicketStatus::Resolved => 3,
            TicketStatus::Closed => 4,
            TicketStatus::Other(_) => UNKNOWN_STATUS_RANK,
        }
    }

    /// Whether moving from `self` to `next` goes forward along the lifecycle.
    pub fn can_advance_to(&self, next: &TicketStatus) -> bool {
        let known = |s: &TicketStatus| !matches!(s, TicketStatus::Other(_));
        known(self) && known(next) && next.rank() > self.rank()
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for TicketStatus {
    fn from(raw: &str) -> Self {
        TicketStatus::parse(raw)
    }
}

impl Serialize for TicketStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TicketStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TicketStatus::parse(&raw))
    }
}

/// A support ticket filed by an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// `<user_id>@NNNN`, sequential per user.
    pub id: String,
    /// Employee who filed the ticket.
    pub user_id: String,
    pub equipment: String,
    pub model: String,
    pub serial: String,
    /// Owner label copied from the equipment form.
    pub owner: String,
    /// UTC calendar day the ticket was raised.
    pub raised_date: NaiveDate,
    pub short_description: String,
    pub detailed_description: String,
    pub created_at: DateTime<Utc>,
    pub status: TicketStatus,
}

/// Build a ticket identifier from the owner and their sequence number.
///
/// The number is zero-padded to four digits; larger numbers keep all digits.
pub fn format_ticket_id(user_id: &str, sequence: u32) -> String {
    format!("{}@{:04}", user_id, sequence)
}
