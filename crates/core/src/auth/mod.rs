//! Authentication boundary.
//!
//! Handlers never read identity from raw request state; they receive an
//! [`Identity`] produced by an [`Authenticator`].

mod session;
mod traits;
mod types;

pub use session::*;
pub use traits::*;
pub use types::*;
