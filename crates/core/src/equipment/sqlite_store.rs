//! SQLite-backed equipment store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::{Equipment, EquipmentError, EquipmentStore, NewEquipment};

/// SQLite-backed equipment store.
pub struct SqliteEquipmentStore {
    conn: Mutex<Connection>,
}

impl SqliteEquipmentStore {
    /// Create a new SQLite equipment store, creating the database file and table if needed.
    pub fn new(path: &Path) -> Result<Self, EquipmentError> {
        let conn = Connection::open(path).map_err(|e| EquipmentError::Database(e.to_string()))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| EquipmentError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite equipment store (useful for testing).
    pub fn in_memory() -> Result<Self, EquipmentError> {
        let conn =
            Connection::open_in_memory().map_err(|e| EquipmentError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), EquipmentError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS equipment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                equipment TEXT NOT NULL,
                model TEXT NOT NULL,
                serial TEXT NOT NULL,
                issue_date TEXT NOT NULL,
                owner TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_equipment_serial ON equipment(serial);
            CREATE INDEX IF NOT EXISTS idx_equipment_user_id ON equipment(user_id);
            "#,
        )
        .map_err(|e| EquipmentError::Database(e.to_string()))
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, EquipmentError> {
        self.conn
            .lock()
            .map_err(|_| EquipmentError::Database("connection lock poisoned".to_string()))
    }

    fn row_to_equipment(row: &rusqlite::Row) -> rusqlite::Result<Equipment> {
        Ok(Equipment {
            id: row.get(0)?,
            user_id: row.get(1)?,
            equipment: row.get(2)?,
            model: row.get(3)?,
            serial: row.get(4)?,
            issue_date: row.get(5)?,
            owner: row.get(6)?,
        })
    }
}

impl EquipmentStore for SqliteEquipmentStore {
    fn insert(&self, request: NewEquipment) -> Result<Equipment, EquipmentError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO equipment (user_id, equipment, model, serial, issue_date, owner) VALUES (?, ?, ?, ?, ?, ?)",
            params![
                request.user_id,
                request.equipment,
                request.model,
                request.serial,
                request.issue_date,
                request.owner,
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref err, _)
                if err.code == ErrorCode::ConstraintViolation =>
            {
                EquipmentError::DuplicateSerial(request.serial.clone())
            }
            other => EquipmentError::Database(other.to_string()),
        })?;

        Ok(Equipment {
            id: conn.last_insert_rowid(),
            user_id: request.user_id,
            equipment: request.equipment,
            model: request.model,
            serial: request.serial,
            issue_date: request.issue_date,
            owner: request.owner,
        })
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Equipment>, EquipmentError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, equipment, model, serial, issue_date, owner FROM equipment WHERE user_id = ? ORDER BY id ASC",
            )
            .map_err(|e| EquipmentError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id], Self::row_to_equipment)
            .map_err(|e| EquipmentError::Database(e.to_string()))?;

        let mut items = Vec::new();
        for row_result in rows {
            items.push(row_result.map_err(|e| EquipmentError::Database(e.to_string()))?);
        }

        Ok(items)
    }

    fn find_by_serial(&self, serial: &str) -> Result<Option<Equipment>, EquipmentError> {
        let conn = self.conn()?;

        conn.query_row(
            "SELECT id, user_id, equipment, model, serial, issue_date, owner FROM equipment WHERE serial = ?",
            params![serial],
            Self::row_to_equipment,
        )
        .optional()
        .map_err(|e| EquipmentError::Database(e.to_string()))
    }
}
