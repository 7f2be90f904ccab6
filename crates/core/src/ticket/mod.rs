//! Support tickets filed by employees.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteTicketStore;
pub use store::{NewTicket, TicketError, TicketFilter, TicketStore};
pub use types::{format_ticket_id, Ticket, TicketStatus, UNKNOWN_STATUS_RANK};
