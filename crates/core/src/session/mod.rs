//! Server-side sessions.
//!
//! A session is identified by an opaque random token handed to the client in
//! a cookie. Only the SHA-256 of the token is stored, together with the
//! identity bound to it and the one-shot state the pages consume (flash
//! messages and the "keep the equipment form open" flag).

mod sqlite_store;
mod store;

pub use sqlite_store::SqliteSessionStore;
pub use store::{hash_token, FlashLevel, FlashMessage, Session, SessionError, SessionStore};
