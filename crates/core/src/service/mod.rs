//! Helpdesk operations.
//!
//! [`HelpdeskService`] is the only thing request handlers talk to. Every
//! operation takes the caller's user id (already authenticated) and returns
//! either a serialisable view or a structured error; deciding how to present
//! either is left to the HTTP layer.

mod dashboard;
mod equipment;
mod tickets;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::UserSeed;
use crate::equipment::{EquipmentError, EquipmentStore};
use crate::ticket::{TicketError, TicketStore};
use crate::user::{User, UserError, UserStore};

pub use dashboard::{normalize_status_filter, sort_for_dashboard, DashboardView};
pub use equipment::{EquipmentForm, RegistrationError, OTHER_EQUIPMENT};
pub use tickets::{TicketFormView, TicketSubmission};

/// Storage failure surfaced by a service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error(transparent)]
    Equipment(#[from] EquipmentError),

    #[error(transparent)]
    User(#[from] UserError),
}

/// The helpdesk request-handling layer over the three stores.
pub struct HelpdeskService {
    users: Arc<dyn UserStore>,
    tickets: Arc<dyn TicketStore>,
    equipment: Arc<dyn EquipmentStore>,
}

impl HelpdeskService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tickets: Arc<dyn TicketStore>,
        equipment: Arc<dyn EquipmentStore>,
    ) -> Self {
        Self {
            users,
            tickets,
            equipment,
        }
    }

    /// Profile of the given user, if one is on file.
    pub fn account(&self, user_id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.users.get(user_id)?)
    }

    /// Create the configured users that don't exist yet. Returns how many were created.
    pub fn seed_users(&self, seeds: &[UserSeed]) -> Result<usize, ServiceError> {
        let mut created = 0;
        for seed in seeds {
            if self
                .users
                .insert_if_absent(&User::new(seed.id.clone(), seed.profile.clone()))?
            {
                info!(user_id = %seed.id, "Seeded user profile");
                created += 1;
            }
        }
        Ok(created)
    }
}
