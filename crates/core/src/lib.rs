pub mod auth;
pub mod config;
pub mod equipment;
pub mod service;
pub mod session;
pub mod ticket;
pub mod user;

pub use auth::{
    session_token, AuthError, AuthRequest, Authenticator, Identity,
    SessionAuthenticator, SESSION_COOKIE,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, Config, ConfigError,
    DatabaseConfig, ServerConfig, UserSeed,
};
pub use equipment::{Equipment, EquipmentError, EquipmentOption, EquipmentStore, SqliteEquipmentStore};
pub use service::{
    DashboardView, EquipmentForm, HelpdeskService, RegistrationError, ServiceError,
    TicketFormView, TicketSubmission,
};
pub use session::{FlashLevel, FlashMessage, Session, SessionError, SessionStore, SqliteSessionStore};
pub use ticket::{SqliteTicketStore, Ticket, TicketError, TicketFilter, TicketStatus, TicketStore};
pub use user::{SqliteUserStore, User, UserError, UserStore};
