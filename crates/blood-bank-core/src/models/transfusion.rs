//! Transfusion models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationResult};
use super::{BloodGroup, Donor, Recipient};

/// Outcome of a transfusion, derived when it is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransfusionStatus {
    Successful,
    Failed,
}

impl TransfusionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TransfusionStatus::Successful => "Successful",
            TransfusionStatus::Failed => "Failed",
        }
    }
}

/// A transfusion from a donor to a recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transfusion {
    pub id: String,
    pub donor_id: String,
    pub recipient_id: String,
    /// Donor's blood group
    pub blood_group: BloodGroup,
    pub transfusion_date: String,
    pub status: TransfusionStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl Transfusion {
    pub fn new(
        donor: &Donor,
        recipient: &Recipient,
        transfused_at: DateTime<Utc>,
        status: TransfusionStatus,
    ) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            donor_id: donor.id.clone(),
            recipient_id: recipient.id.clone(),
            blood_group: donor.blood_group,
            transfusion_date: transfused_at.to_rfc3339(),
            status,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Transfusion payload. The status is never taken from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTransfusion {
    #[serde(alias = "donor")]
    pub donor_id: String,
    #[serde(alias = "recipient")]
    pub recipient_id: String,
    pub transfusion_date: Option<String>,
}

impl NewTransfusion {
    /// Parsed transfusion date, defaulting to now.
    pub fn transfused_at(&self) -> ValidationResult<DateTime<Utc>> {
        validation::date_or("transfusionDate", self.transfusion_date.as_deref(), Utc::now())
    }
}
