use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    /// User profiles seeded into the store at startup (skipped if already present).
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("helpdesk.db")
}

/// Session and identity configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Identity assigned to a session by the entry route.
    #[serde(default = "default_demo_user_id")]
    pub demo_user_id: String,
    /// Lifetime of an issued session.
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: u32,
    /// Mark the session cookie `Secure` (only sent over HTTPS).
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            demo_user_id: default_demo_user_id(),
            session_ttl_minutes: default_session_ttl_minutes(),
            cookie_secure: false,
        }
    }
}

fn default_demo_user_id() -> String {
    "EMP45678".to_string()
}

fn default_session_ttl_minutes() -> u32 {
    720
}

/// A user record to create at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSeed {
    pub id: String,
    #[serde(default)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}
