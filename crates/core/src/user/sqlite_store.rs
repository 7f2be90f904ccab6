//! SQLite-backed user store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};

use super::{User, UserError, UserStore};

/// SQLite-backed user store.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Create a new SQLite user store, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, UserError> {
        let conn = Connection::open(path).map_err(|e| UserError::Database(e.to_string()))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| UserError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite user store (useful for testing).
    pub fn in_memory() -> Result<Self, UserError> {
        let conn = Connection::open_in_memory().map_err(|e| UserError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), UserError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                profile TEXT NOT NULL DEFAULT '{}'
            );
            "#,
        )
        .map_err(|e| UserError::Database(e.to_string()))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, UserError> {
        self.conn
            .lock()
            .map_err(|_| UserError::Database("connection lock poisoned".to_string()))
    }
}

impl UserStore for SqliteUserStore {
    fn get(&self, id: &str) -> Result<Option<User>, UserError> {
        let conn = self.conn()?;

        let profile_json: Option<String> = conn
            .query_row(
                "SELECT profile FROM users WHERE id = ?",
                params![id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| UserError::Database(e.to_string()))?;

        profile_json
            .map(|json| {
                let profile: Map<String, Value> =
                    serde_json::from_str(&json).map_err(|e| UserError::InvalidProfile {
                        id: id.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(User::new(id, profile))
            })
            .transpose()
    }

    fn insert_if_absent(&self, user: &User) -> Result<bool, UserError> {
        let conn = self.conn()?;

        let profile_json =
            serde_json::to_string(&user.profile).map_err(|e| UserError::Database(e.to_string()))?;

        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO users (id, profile) VALUES (?, ?)",
                params![user.id, profile_json],
            )
            .map_err(|e| UserError::Database(e.to_string()))?;

        Ok(inserted > 0)
    }
}
