//! Donor models.

use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationError, ValidationResult};
use super::{BloodGroup, Gender};

/// Map position of a donor's address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }
}

/// A registered blood donor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    /// Record ID (UUID)
    pub id: String,
    pub name: String,
    /// Lowercased, unique across donors
    pub email: String,
    pub phone: String,
    pub blood_group: BloodGroup,
    pub gender: Gender,
    /// Date of the most recent donation, if known
    pub last_donated: Option<String>,
    pub address: String,
    pub city: String,
    /// Geocoded position; donors without one are left off the map
    pub coordinates: Option<Coordinates>,
    pub created_at: String,
    pub updated_at: String,
}

impl Donor {
    /// Create a new donor with required fields.
    pub fn new(
        name: String,
        email: String,
        blood_group: BloodGroup,
        gender: Gender,
        city: String,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email: email.trim().to_lowercase(),
            phone: String::new(),
            blood_group,
            gender,
            last_donated: None,
            address: String::new(),
            city,
            coordinates: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Whether this donor can be placed on a map.
    pub fn is_mappable(&self) -> bool {
        self.coordinates.map(|c| c.is_valid()).unwrap_or(false)
    }
}

/// Donor registration payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDonor {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub blood_group: String,
    pub gender: String,
    pub last_donated: Option<String>,
    pub address: String,
    pub city: String,
    pub coordinates: Option<Coordinates>,
}

impl NewDonor {
    /// Validate fields and build the donor record.
    pub fn into_donor(self) -> ValidationResult<Donor> {
        let name = validation::required("name", &self.name)?;
        let email = validation::required("email", &self.email)?;
        if !is_plausible_email(&email) {
            return Err(ValidationError(format!("email is not valid: {}", email)));
        }
        let phone = validation::required("phone", &self.phone)?;
        let blood_group =
            validation::blood_group(&validation::required("bloodGroup", &self.blood_group)?)?;
        let gender = validation::gender(&validation::required("gender", &self.gender)?)?;
        let address = validation::required("address", &self.address)?;
        let city = validation::required("city", &self.city)?;

        let last_donated = match self.last_donated.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(
                validation::date_or("lastDonated", Some(raw), chrono::Utc::now())?.to_rfc3339(),
            ),
            _ => None,
        };

        if let Some(coords) = self.coordinates {
            if !coords.is_valid() {
                return Err(ValidationError("coordinates are out of range".into()));
            }
        }

        let mut donor = Donor::new(name, email, blood_group, gender, city);
        donor.phone = phone;
        donor.address = address;
        donor.last_donated = last_donated;
        donor.coordinates = self.coordinates;
        Ok(donor)
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NewDonor {
        NewDonor {
            name: "Ali Raza".into(),
            email: "  Ali.Raza@Example.com ".into(),
            phone: "03001234567".into(),
            blood_group: "B+".into(),
            gender: "male".into(),
            last_donated: None,
            address: "12 Mall Road".into(),
            city: "Lahore".into(),
            coordinates: Some(Coordinates {
                longitude: 74.3587,
                latitude: 31.5204,
            }),
        }
    }

    #[test]
    fn test_new_donor() {
        let donor = Donor::new(
            "Sana".into(),
            "SANA@example.com".into(),
            BloodGroup::ONegative,
            Gender::Female,
            "Lahore".into(),
        );
        assert_eq!(donor.email, "sana@example.com");
        assert_eq!(donor.id.len(), 36); // UUID format
        assert!(!donor.is_mappable());
    }

    #[test]
    fn test_into_donor_normalizes() {
        let donor = payload().into_donor().unwrap();
        assert_eq!(donor.email, "ali.raza@example.com");
        assert_eq!(donor.gender, Gender::Male);
        assert_eq!(donor.blood_group, BloodGroup::BPositive);
        assert!(donor.is_mappable());
    }

    #[test]
    fn test_into_donor_rejects_missing_fields() {
        let mut p = payload();
        p.phone = String::new();
        assert_eq!(p.into_donor().unwrap_err().to_string(), "phone is required");

        let mut p = payload();
        p.blood_group = "C+".into();
        assert!(p.into_donor().is_err());

        let mut p = payload();
        p.email = "not-an-email".into();
        assert!(p.into_donor().is_err());
    }

    #[test]
    fn test_into_donor_rejects_bad_last_donated() {
        let mut p = payload();
        p.last_donated = Some("last week".into());
        assert!(p.into_donor().is_err());

        let mut p = payload();
        p.last_donated = Some("2024-02-01".into());
        let donor = p.into_donor().unwrap();
        assert!(donor.last_donated.unwrap().starts_with("2024-02-01T00:00:00"));
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let donor = payload().into_donor().unwrap();
        let json = serde_json::to_string(&donor).unwrap();
        assert!(json.contains("\"bloodGroup\":\"B+\""));
        assert!(json.contains("\"lastDonated\":null"));
    }
}
