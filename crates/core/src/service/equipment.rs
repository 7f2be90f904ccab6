use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::{HelpdeskService, ServiceError};
use crate::equipment::{Equipment, EquipmentError, NewEquipment};

/// Equipment type value that means "use `custom_equipment` instead".
pub const OTHER_EQUIPMENT: &str = "Other";

/// Raw equipment registration form. Any field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EquipmentForm {
    pub equipment: Option<String>,
    pub custom_equipment: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub issue_date: Option<String>,
    pub owner: Option<String>,
}

/// Why an equipment registration was rejected.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// One or more of the required fields were missing or empty.
    #[error("All fields are required.")]
    MissingFields(Vec<&'static str>),

    #[error("Serial number already exists. Please use a unique one.")]
    DuplicateSerial(String),

    #[error(transparent)]
    Storage(#[from] ServiceError),
}

impl From<EquipmentError> for RegistrationError {
    fn from(err: EquipmentError) -> Self {
        match err {
            EquipmentError::DuplicateSerial(serial) => RegistrationError::DuplicateSerial(serial),
            other => RegistrationError::Storage(other.into()),
        }
    }
}

impl EquipmentForm {
    /// Apply the "Other" substitution and check every field is present.
    fn resolve(self, user_id: &str) -> Result<NewEquipment, RegistrationError> {
        let equipment = match self.equipment {
            Some(kind) if kind == OTHER_EQUIPMENT => self.custom_equipment,
            kind => kind,
        };

        let fields = [
            ("equipment", equipment),
            ("model", self.model),
            ("serial", self.serial),
            ("issue_date", self.issue_date),
            ("owner", self.owner),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(RegistrationError::MissingFields(missing));
        }

        let [equipment, model, serial, issue_date, owner] =
            fields.map(|(_, value)| value.unwrap_or_default());

        Ok(NewEquipment {
            user_id: user_id.to_string(),
            equipment,
            model,
            serial,
            issue_date,
            owner,
        })
    }
}

impl HelpdeskService {
    /// All equipment registered by the user, oldest first.
    pub fn list_equipment(&self, user_id: &str) -> Result<Vec<Equipment>, ServiceError> {
        Ok(self.equipment.list_for_user(user_id)?)
    }

    /// Validate and store a new piece of equipment for the user.
    ///
    /// Serial numbers must be unique across all users.
    pub fn register_equipment(
        &self,
        user_id: &str,
        form: EquipmentForm,
    ) -> Result<Equipment, RegistrationError> {
        let request = form.resolve(user_id).inspect_err(|e| {
            if let RegistrationError::MissingFields(missing) = e {
                warn!(user_id, ?missing, "Equipment registration missing fields");
            }
        })?;

        if self.equipment.find_by_serial(&request.serial)?.is_some() {
            warn!(user_id, serial = %request.serial, "Equipment serial already registered");
            return Err(RegistrationError::DuplicateSerial(request.serial));
        }

        let item = self.equipment.insert(request)?;
        info!(
            user_id,
            equipment_id = item.id,
            equipment = %item.equipment,
            "Registered equipment"
        );
        Ok(item)
    }
}
