//! Recipient models.

use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationResult};
use super::{BloodGroup, Gender};

/// A patient who may receive blood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub id: String,
    pub name: String,
    pub blood_group: BloodGroup,
    pub phone: String,
    pub city: String,
    pub gender: Gender,
    pub created_at: String,
    pub updated_at: String,
}

impl Recipient {
    pub fn new(name: String, blood_group: BloodGroup, gender: Gender, city: String) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            blood_group,
            phone: String::new(),
            city,
            gender,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Recipient registration payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRecipient {
    pub name: String,
    pub blood_group: String,
    pub phone: String,
    pub city: String,
    pub gender: String,
}

impl NewRecipient {
    pub fn into_recipient(self) -> ValidationResult<Recipient> {
        let name = validation::required("name", &self.name)?;
        let blood_group =
            validation::blood_group(&validation::required("bloodGroup", &self.blood_group)?)?;
        let phone = validation::required("phone", &self.phone)?;
        let city = validation::required("city", &self.city)?;
        let gender = validation::gender(&validation::required("gender", &self.gender)?)?;

        let mut recipient = Recipient::new(name, blood_group, gender, city);
        recipient.phone = phone;
        Ok(recipient)
    }
}
