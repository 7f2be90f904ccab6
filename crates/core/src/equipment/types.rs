use serde::{Deserialize, Serialize};

/// A registered hardware asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: i64,
    /// Employee the record belongs to.
    pub user_id: String,
    /// Equipment type, e.g. "Laptop".
    pub equipment: String,
    pub model: String,
    pub serial: String,
    /// Free-text issue date as entered on the form.
    pub issue_date: String,
    /// Owner label as entered on the form.
    pub owner: String,
}

/// One entry of the equipment picker on the ticket form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentOption {
    pub equipment: String,
    pub model: String,
    pub serial: String,
    pub owner: String,
    pub label: String,
}

impl From<&Equipment> for EquipmentOption {
    fn from(item: &Equipment) -> Self {
        Self {
            equipment: item.equipment.clone(),
            model: item.model.clone(),
            serial: item.serial.clone(),
            owner: item.owner.clone(),
            label: equipment_label(&item.equipment, &item.serial),
        }
    }
}

/// `"{type} - {last four of serial}"`, or just the type for short serials.
pub fn equipment_label(equipment: &str, serial: &str) -> String {
    let chars: Vec<char> = serial.chars().collect();
    if chars.len() < 4 {
        return equipment.to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{} - {}", equipment, tail)
}
