//! Hardware assets registered against employees.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteEquipmentStore;
pub use store::{EquipmentError, EquipmentStore, NewEquipment};
pub use types::{equipment_label, Equipment, EquipmentOption};
