//! SQLite-backed ticket store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, types::Type, Connection, ErrorCode, OptionalExtension};

use super::{
    format_ticket_id, NewTicket, Ticket, TicketError, TicketFilter, TicketStatus, TicketStore,
};

const TICKET_COLUMNS: &str = "id, user_id, equipment, model, serial, owner, raised_date, short_description, detailed_description, created_at, status";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    conn: Mutex<Connection>,
}

impl SqliteTicketStore {
    /// Create a new SQLite ticket store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, TicketError> {
        let conn = Connection::open(path).map_err(|e| TicketError::Database(e.to_string()))?;
        // Every store opens its own connection to the shared file.
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| TicketError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite ticket store (useful for testing).
    pub fn in_memory() -> Result<Self, TicketError> {
        let conn =
            Connection::open_in_memory().map_err(|e| TicketError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), TicketError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                equipment TEXT NOT NULL,
                model TEXT NOT NULL,
                serial TEXT NOT NULL,
                owner TEXT NOT NULL,
                raised_date TEXT NOT NULL,
                short_description TEXT NOT NULL,
                detailed_description TEXT NOT NULL,
                created_at TEXT NOT NULL,
                status TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tickets_user_status ON tickets(user_id, status);

            -- Last number handed out per user; bumped in the same transaction as the insert.
            CREATE TABLE IF NOT EXISTS ticket_sequences (
                user_id TEXT PRIMARY KEY,
                last_number INTEGER NOT NULL
            );
            "#,
        )
        .map_err(|e| TicketError::Database(e.to_string()))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, TicketError> {
        self.conn
            .lock()
            .map_err(|_| TicketError::Database("connection lock poisoned".to_string()))
    }

    fn build_where_clause(filter: &TicketFilter) -> (String, Vec<String>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(ref user_id) = filter.user_id {
            conditions.push("user_id = ?");
            params.push(user_id.clone());
        }

        if let Some(ref status) = filter.status {
            conditions.push("status = ?");
            params.push(status.clone());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let raised_date_str: String = row.get(6)?;
        let created_at_str: String = row.get(9)?;
        let status_str: String = row.get(10)?;

        let raised_date = NaiveDate::parse_from_str(&raised_date_str, "%Y-%m-%d")
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e)))?;

        Ok(Ticket {
            id: row.get(0)?,
            user_id: row.get(1)?,
            equipment: row.get(2)?,
            model: row.get(3)?,
            serial: row.get(4)?,
            owner: row.get(5)?,
            raised_date,
            short_description: row.get(7)?,
            detailed_description: row.get(8)?,
            created_at,
            status: TicketStatus::parse(&status_str),
        })
    }
}

/// Fixed-width UTC timestamps so that string order matches time order.
fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl TicketStore for SqliteTicketStore {
    fn create(&self, request: NewTicket) -> Result<Ticket, TicketError> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| TicketError::Database(e.to_string()))?;

        // Never hand out a number at or below an id already on file, whoever wrote it.
        let prefix = format!("{}@", request.user_id);
        let number: u32 = tx
            .query_row(
                "INSERT INTO ticket_sequences (user_id, last_number)
                 VALUES (?1, (SELECT COALESCE(MAX(CAST(substr(id, length(?2) + 1) AS INTEGER)), 0)
                              FROM tickets WHERE substr(id, 1, length(?2)) = ?2) + 1)
                 ON CONFLICT(user_id) DO UPDATE
                     SET last_number = MAX(last_number, excluded.last_number - 1) + 1
                 RETURNING last_number",
                params![request.user_id, prefix],
                |row| row.get(0),
            )
            .map_err(|e| TicketError::Database(e.to_string()))?;

        // Stored with microsecond precision.
        let created_at = request.created_at.trunc_subsecs(6);
        let ticket = Ticket {
            id: format_ticket_id(&request.user_id, number),
            user_id: request.user_id,
            equipment: request.equipment,
            model: request.model,
            serial: request.serial,
            owner: request.owner,
            raised_date: created_at.date_naive(),
            short_description: request.short_description,
            detailed_description: request.detailed_description,
            created_at,
            status: TicketStatus::Pending,
        };

        tx.execute(
            &format!(
                "INSERT INTO tickets ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                TICKET_COLUMNS
            ),
            params![
                ticket.id,
                ticket.user_id,
                ticket.equipment,
                ticket.model,
                ticket.serial,
                ticket.owner,
                ticket.raised_date.format("%Y-%m-%d").to_string(),
                ticket.short_description,
                ticket.detailed_description,
                timestamp(&ticket.created_at),
                ticket.status.as_str(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref err, _)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                TicketError::DuplicateId(ticket.id.clone())
            }
            other => TicketError::Database(other.to_string()),
        })?;

        tx.commit()
            .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(ticket)
    }

    fn get(&self, id: &str) -> Result<Option<Ticket>, TicketError> {
        let conn = self.conn()?;

        conn.query_row(
            &format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS),
            params![id],
            Self::row_to_ticket,
        )
        .optional()
        .map_err(|e| TicketError::Database(e.to_string()))
    }

    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError> {
        let conn = self.conn()?;

        let (where_clause, params) = Self::build_where_clause(filter);
        let sql = format!(
            "SELECT {} FROM tickets {} ORDER BY rowid ASC",
            TICKET_COLUMNS, where_clause
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), Self::row_to_ticket)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| TicketError::Database(e.to_string()))
    }

    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError> {
        let conn = self.conn()?;

        let (where_clause, params) = Self::build_where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM tickets {}", where_clause);

        conn.query_row(&sql, rusqlite::params_from_iter(params.iter()), |row| {
            row.get(0)
        })
        .map_err(|e| TicketError::Database(e.to_string()))
    }

    fn transition_status(
        &self,
        id: &str,
        user_id: &str,
        from: &TicketStatus,
        to: &TicketStatus,
    ) -> Result<bool, TicketError> {
        if !from.can_advance_to(to) {
            return Err(TicketError::InvalidTransition {
                from: from.clone(),
                to: to.clone(),
            });
        }

        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE tickets SET status = ? WHERE id = ? AND user_id = ? AND status = ?",
                params![to.as_str(), id, user_id, from.as_str()],
            )
            .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(changed > 0)
    }
}
