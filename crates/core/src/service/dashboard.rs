use serde::Serialize;
use tracing::debug;

use super::{HelpdeskService, ServiceError};
use crate::ticket::{Ticket, TicketFilter, TicketStatus};
use crate::user::User;

/// Filter value that disables status filtering.
const ALL_STATUSES: &str = "all";

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub user: Option<User>,
    /// Tickets matching the filter, in dashboard order.
    pub tickets: Vec<Ticket>,
    // The per-status counts ignore the filter.
    pub pending_count: i64,
    pub in_progress_count: i64,
    pub resolved_count: i64,
    pub closed_count: i64,
    /// Number of tickets in `tickets`.
    pub total: usize,
    /// The filter exactly as requested.
    pub selected_status: Option<String>,
}

/// Turn the raw `status` query value into a status to match, if any.
///
/// Absent, empty and `all` (any case) mean no filtering.
pub fn normalize_status_filter(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .filter(|s| s != ALL_STATUSES)
}

/// Order by lifecycle rank, then oldest first. Unknown statuses go last.
pub fn sort_for_dashboard(tickets: &mut [Ticket]) {
    tickets.sort_by(|a, b| {
        (a.status.rank(), a.created_at).cmp(&(b.status.rank(), b.created_at))
    });
}

impl HelpdeskService {
    pub fn dashboard(
        &self,
        user_id: &str,
        status: Option<&str>,
    ) -> Result<DashboardView, ServiceError> {
        let user = self.users.get(user_id)?;

        let mut filter = TicketFilter::new().with_user(user_id);
        if let Some(wanted) = normalize_status_filter(status) {
            filter = filter.with_status(wanted);
        }

        let mut tickets = self.tickets.list(&filter)?;
        sort_for_dashboard(&mut tickets);

        let count = |status: TicketStatus| {
            self.tickets
                .count(&TicketFilter::new().with_user(user_id).with_status(status.as_str()))
        };
        let pending_count = count(TicketStatus::Pending)?;
        let in_progress_count = count(TicketStatus::InProgress)?;
        let resolved_count = count(TicketStatus::Resolved)?;
        let closed_count = count(TicketStatus::Closed)?;

        debug!(
            user_id,
            filter = ?filter.status,
            shown = tickets.len(),
            "Built dashboard"
        );

        Ok(DashboardView {
            user,
            total: tickets.len(),
            tickets,
            pending_count,
            in_progress_count,
            resolved_count,
            closed_count,
            selected_status: status.map(str::to_string),
        })
    }
}
