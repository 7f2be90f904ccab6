use super::{types::Config, ConfigError};

/// Longest session lifetime accepted: one year.
pub const MAX_SESSION_TTL_MINUTES: u32 = 365 * 24 * 60;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Demo user id is not blank
/// - Session TTL is between 1 minute and [`MAX_SESSION_TTL_MINUTES`]
/// - Seed users have non-blank, unique ids
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.auth.demo_user_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "auth.demo_user_id cannot be empty".to_string(),
        ));
    }

    if config.auth.session_ttl_minutes == 0 {
        return Err(ConfigError::ValidationError(
            "auth.session_ttl_minutes cannot be 0".to_string(),
        ));
    }

    if config.auth.session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
        return Err(ConfigError::ValidationError(format!(
            "auth.session_ttl_minutes cannot exceed {} (one year)",
            MAX_SESSION_TTL_MINUTES
        )));
    }

    let mut seen = std::collections::HashSet::new();
    for user in &config.users {
        if user.id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "users[].id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(user.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "users[].id '{}' is listed more than once",
                user.id
            )));
        }
    }

    Ok(())
}
