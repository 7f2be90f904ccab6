pub mod account;
pub mod dashboard;
pub mod equipment;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod tickets;

pub use routes::create_router;
