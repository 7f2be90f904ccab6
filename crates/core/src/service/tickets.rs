use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{HelpdeskService, ServiceError};
use crate::equipment::EquipmentOption;
use crate::ticket::{NewTicket, Ticket, TicketFilter, TicketStatus};

/// Ticket submission form. Fields are free text and may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketSubmission {
    pub equipment: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub owner: Option<String>,
    pub short_desc: Option<String>,
    pub long_desc: Option<String>,
}

/// Data backing the ticket submission page.
#[derive(Debug, Clone, Serialize)]
pub struct TicketFormView {
    pub user_equipments: Vec<EquipmentOption>,
    /// The user's tickets as stored, without sorting.
    pub tickets: Vec<Ticket>,
}

impl HelpdeskService {
    /// Record a new pending ticket for the user.
    pub fn submit_ticket(
        &self,
        user_id: &str,
        submission: TicketSubmission,
    ) -> Result<Ticket, ServiceError> {
        let ticket = self.tickets.create(NewTicket {
            user_id: user_id.to_string(),
            equipment: submission.equipment.unwrap_or_default(),
            model: submission.model.unwrap_or_default(),
            serial: submission.serial.unwrap_or_default(),
            owner: submission.owner.unwrap_or_default(),
            short_description: submission.short_desc.unwrap_or_default(),
            detailed_description: submission.long_desc.unwrap_or_default(),
            created_at: Utc::now(),
        })?;

        info!(user_id, ticket_id = %ticket.id, "Ticket submitted");
        Ok(ticket)
    }

    /// Close a resolved ticket owned by the user.
    ///
    /// Returns whether anything changed. Unknown tickets, tickets of other
    /// users and tickets not in `resolved` are left alone.
    pub fn verify_ticket(&self, user_id: &str, ticket_id: &str) -> Result<bool, ServiceError> {
        let closed = self.tickets.transition_status(
            ticket_id,
            user_id,
            &TicketStatus::Resolved,
            &TicketStatus::Closed,
        )?;

        if closed {
            info!(user_id, ticket_id, "Ticket verified and closed");
        } else {
            debug!(user_id, ticket_id, "Verification matched no resolved ticket");
        }
        Ok(closed)
    }

    pub fn ticket_form(&self, user_id: &str) -> Result<TicketFormView, ServiceError> {
        let user_equipments = self
            .equipment
            .list_for_user(user_id)?
            .iter()
            .map(EquipmentOption::from)
            .collect();
        let tickets = self.tickets.list(&TicketFilter::new().with_user(user_id))?;

        Ok(TicketFormView {
            user_equipments,
            tickets,
        })
    }
}
