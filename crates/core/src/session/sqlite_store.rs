//! SQLite-backed session store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};

use super::{hash_token, FlashMessage, Session, SessionError, SessionStore};

/// SQLite-backed session store.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
    ttl: Duration,
}

impl SqliteSessionStore {
    /// Create a new SQLite session store, creating the database file and table if needed.
    pub fn new(path: &Path, ttl: Duration) -> Result<Self, SessionError> {
        let conn = Connection::open(path).map_err(|e| SessionError::Database(e.to_string()))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| SessionError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl,
        })
    }

    /// Create an in-memory SQLite session store (useful for testing).
    pub fn in_memory(ttl: Duration) -> Result<Self, SessionError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SessionError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            ttl,
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), SessionError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token_hash TEXT PRIMARY KEY,
                user_id TEXT,
                show_form INTEGER NOT NULL DEFAULT 0,
                flashes TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
            "#,
        )
        .map_err(|e| SessionError::Database(e.to_string()))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, SessionError> {
        self.conn
            .lock()
            .map_err(|_| SessionError::Database("connection lock poisoned".to_string()))
    }

    fn load(conn: &Connection, token_hash: &str) -> Result<Option<Session>, SessionError> {
        conn.query_row(
            "SELECT user_id, show_form, flashes, created_at, expires_at FROM sessions WHERE token_hash = ? AND expires_at > ?",
            params![token_hash, timestamp(&Utc::now())],
            Self::row_to_session,
        )
        .optional()
        .map_err(|e| SessionError::Database(e.to_string()))
    }

    fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<Session> {
        let flashes_json: String = row.get(2)?;
        let flashes: Vec<FlashMessage> = serde_json::from_str(&flashes_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

        Ok(Session {
            user_id: row.get(0)?,
            show_form: row.get(1)?,
            flashes,
            created_at: parse_timestamp(row, 3)?,
            expires_at: parse_timestamp(row, 4)?,
        })
    }
}

fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl SessionStore for SqliteSessionStore {
    fn create(&self, user_id: Option<&str>) -> Result<String, SessionError> {
        let conn = self.conn()?;

        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO sessions (token_hash, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
            params![
                hash_token(&token),
                user_id,
                timestamp(&now),
                timestamp(&(now + self.ttl)),
            ],
        )
        .map_err(|e| SessionError::Database(e.to_string()))?;

        Ok(token)
    }

    fn get(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let conn = self.conn()?;
        Self::load(&conn, &hash_token(token))
    }

    fn assign_user(&self, token: &str, user_id: &str) -> Result<bool, SessionError> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE sessions SET user_id = ? WHERE token_hash = ? AND expires_at > ?",
                params![user_id, hash_token(token), timestamp(&Utc::now())],
            )
            .map_err(|e| SessionError::Database(e.to_string()))?;
        Ok(changed > 0)
    }

    fn push_flash(&self, token: &str, flash: FlashMessage) -> Result<(), SessionError> {
        let conn = self.conn()?;
        let token_hash = hash_token(token);

        let Some(mut session) = Self::load(&conn, &token_hash)? else {
            return Ok(());
        };
        session.flashes.push(flash);

        let flashes_json = serde_json::to_string(&session.flashes)
            .map_err(|e| SessionError::Database(e.to_string()))?;
        conn.execute(
            "UPDATE sessions SET flashes = ? WHERE token_hash = ?",
            params![flashes_json, token_hash],
        )
        .map_err(|e| SessionError::Database(e.to_string()))?;

        Ok(())
    }

    fn take_flashes(&self, token: &str) -> Result<Vec<FlashMessage>, SessionError> {
        let conn = self.conn()?;
        let token_hash = hash_token(token);

        let Some(session) = Self::load(&conn, &token_hash)? else {
            return Ok(Vec::new());
        };
        if !session.flashes.is_empty() {
            conn.execute(
                "UPDATE sessions SET flashes = '[]' WHERE token_hash = ?",
                params![token_hash],
            )
            .map_err(|e| SessionError::Database(e.to_string()))?;
        }

        Ok(session.flashes)
    }

    fn set_show_form(&self, token: &str, show: bool) -> Result<(), SessionError> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE sessions SET show_form = ? WHERE token_hash = ? AND expires_at > ?",
            params![show, hash_token(token), timestamp(&Utc::now())],
        )
        .map_err(|e| SessionError::Database(e.to_string()))?;
        Ok(())
    }

    fn take_show_form(&self, token: &str) -> Result<bool, SessionError> {
        let conn = self.conn()?;
        let token_hash = hash_token(token);

        let Some(session) = Self::load(&conn, &token_hash)? else {
            return Ok(false);
        };
        if session.show_form {
            conn.execute(
                "UPDATE sessions SET show_form = 0 WHERE token_hash = ?",
                params![token_hash],
            )
            .map_err(|e| SessionError::Database(e.to_string()))?;
        }

        Ok(session.show_form)
    }

    fn delete(&self, token: &str) -> Result<bool, SessionError> {
        let conn = self.conn()?;
        let removed = conn
            .execute(
                "DELETE FROM sessions WHERE token_hash = ?",
                params![hash_token(token)],
            )
            .map_err(|e| SessionError::Database(e.to_string()))?;
        Ok(removed > 0)
    }

    fn purge_expired(&self) -> Result<usize, SessionError> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?",
            params![timestamp(&Utc::now())],
        )
        .map_err(|e| SessionError::Database(e.to_string()))
    }
}
