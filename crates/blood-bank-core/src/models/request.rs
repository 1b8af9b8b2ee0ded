//! Blood request models.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationError, ValidationResult};
use super::{BloodGroup, Recipient};

/// Request lifecycle status. Transitions are made by staff, never derived.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum RequestStatus {
    #[default]
    Pending,
    Fulfilled,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Pending,
        RequestStatus::Fulfilled,
        RequestStatus::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Fulfilled => "Fulfilled",
            RequestStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::ALL
            .iter()
            .copied()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError(format!("Unknown request status: {}", s)))
    }
}

/// A recipient's request for blood.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    pub id: String,
    pub recipient_id: String,
    pub blood_group: BloodGroup,
    /// Units requested
    pub quantity: u32,
    pub status: RequestStatus,
    pub request_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BloodRequest {
    /// Create a pending request for `recipient`'s own blood group.
    pub fn new(recipient: &Recipient, quantity: u32) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            recipient_id: recipient.id.clone(),
            blood_group: recipient.blood_group,
            quantity,
            status: RequestStatus::Pending,
            request_date: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.status == RequestStatus::Fulfilled
    }
}

/// Request payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRequest {
    #[serde(alias = "recipient")]
    pub recipient_id: String,
    /// Defaults to the recipient's blood group
    pub blood_group: Option<String>,
    pub quantity: i64,
    pub status: Option<String>,
    pub request_date: Option<String>,
}

impl NewRequest {
    pub fn into_request(self, recipient: &Recipient) -> ValidationResult<BloodRequest> {
        if self.quantity <= 0 {
            return Err(ValidationError("quantity must be at least 1".into()));
        }
        let quantity = u32::try_from(self.quantity)
            .map_err(|_| ValidationError(format!("quantity is too large: {}", self.quantity)))?;

        let mut request = BloodRequest::new(recipient, quantity);
        if let Some(group) = self.blood_group.as_deref().filter(|g| !g.trim().is_empty()) {
            request.blood_group = validation::blood_group(group)?;
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            request.status = status.parse()?;
        }
        request.request_date =
            validation::date_or("requestDate", self.request_date.as_deref(), Utc::now())?
                .to_rfc3339();
        Ok(request)
    }
}
