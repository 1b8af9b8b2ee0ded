//! Donation models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationResult};
use super::{parse_timestamp, BloodGroup, Donor};

/// Days a donated unit stays usable.
pub const SHELF_LIFE_DAYS: i64 = 42;

/// A unit of blood given by a donor.
///
/// Immutable once stored; corrections are made by deleting the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub donor_id: String,
    /// Copied from the donor at creation
    pub blood_group: BloodGroup,
    pub donation_date: String,
    /// donation_date + SHELF_LIFE_DAYS
    pub expiry_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Donation {
    /// Record a donation from `donor` made at `donated_at`.
    pub fn new(donor: &Donor, donated_at: DateTime<Utc>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            donor_id: donor.id.clone(),
            blood_group: donor.blood_group,
            donation_date: donated_at.to_rfc3339(),
            expiry_date: (donated_at + Duration::days(SHELF_LIFE_DAYS)).to_rfc3339(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Parsed donation date, `None` when the stored value is malformed.
    pub fn donated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.donation_date)
    }
}

/// Donation payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDonation {
    #[serde(alias = "donor")]
    pub donor_id: String,
    /// Defaults to now
    pub donation_date: Option<String>,
}

impl NewDonation {
    pub fn into_donation(self, donor: &Donor) -> ValidationResult<Donation> {
        let donated_at =
            validation::date_or("donationDate", self.donation_date.as_deref(), Utc::now())?;
        Ok(Donation::new(donor, donated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn donor() -> Donor {
        Donor::new(
            "Bilal".into(),
            "bilal@example.com".into(),
            BloodGroup::ANegative,
            Gender::Male,
            "Lahore".into(),
        )
    }

    #[test]
    fn test_new_donation_copies_group_and_sets_expiry() {
        let donated_at = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let donation = Donation::new(&donor(), donated_at);

        assert_eq!(donation.blood_group, BloodGroup::ANegative);
        assert_eq!(
            parse_timestamp(&donation.expiry_date).unwrap(),
            "2024-02-12T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_malformed_dates() {
        let mut donation = Donation::new(&donor(), Utc::now());
        donation.donation_date = "garbage".into();
        donation.expiry_date = "garbage".into();

        assert!(donation.donated_at().is_none());
    }

    #[test]
    fn test_payload_accepts_donor_alias() {
        let payload: NewDonation =
            serde_json::from_str(r#"{"donor":"abc","donationDate":"2024-05-01"}"#).unwrap();
        assert_eq!(payload.donor_id, "abc");

        let donation = payload.into_donation(&donor()).unwrap();
        assert!(donation.donation_date.starts_with("2024-05-01"));
    }
}
