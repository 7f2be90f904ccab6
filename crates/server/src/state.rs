use std::sync::Arc;

use helpdesk_core::{AuthConfig, Authenticator, Config, HelpdeskService, SessionStore};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    sessions: Arc<dyn SessionStore>,
    service: HelpdeskService,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        sessions: Arc<dyn SessionStore>,
        service: HelpdeskService,
    ) -> Self {
        Self {
            config,
            authenticator,
            sessions,
            service,
        }
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.config.auth
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn sessions(&self) -> &dyn SessionStore {
        self.sessions.as_ref()
    }

    pub fn service(&self) -> &HelpdeskService {
        &self.service
    }
}
