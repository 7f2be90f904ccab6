//! Equipment storage trait and types.

use thiserror::Error;

use super::Equipment;

#[derive(Debug, Error)]
pub enum EquipmentError {
    /// The serial number is already registered (to any user).
    #[error("Serial number already registered: {0}")]
    DuplicateSerial(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Request to register a piece of equipment.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEquipment {
    pub user_id: String,
    pub equipment: String,
    pub model: String,
    pub serial: String,
    pub issue_date: String,
    pub owner: String,
}

/// Trait for equipment storage backends.
///
/// Serial numbers are unique across the whole store.
pub trait EquipmentStore: Send + Sync {
    /// Insert a record, failing with [`EquipmentError::DuplicateSerial`]
    /// if the serial is taken.
    fn insert(&self, request: NewEquipment) -> Result<Equipment, EquipmentError>;

    /// All equipment owned by a user, in registration order.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Equipment>, EquipmentError>;

    /// Look up a record by serial regardless of owner.
    fn find_by_serial(&self, serial: &str) -> Result<Option<Equipment>, EquipmentError>;
}
