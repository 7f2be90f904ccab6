//! Employee profiles. Records are created outside this service (or seeded
//! from configuration) and only read by request handlers.

mod sqlite_store;
mod store;

pub use sqlite_store::SqliteUserStore;
pub use store::{User, UserError, UserStore};
