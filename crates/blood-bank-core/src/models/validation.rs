//! Field validation for incoming records.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{parse_timestamp, BloodGroup, Gender};

/// A record failed validation before reaching the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Require a non-blank string field, returning it trimmed.
pub fn required(field: &str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub fn blood_group(value: &str) -> ValidationResult<BloodGroup> {
    value
        .parse()
        .map_err(|e: super::UnknownBloodGroup| ValidationError(e.to_string()))
}

pub fn gender(value: &str) -> ValidationResult<Gender> {
    value
        .parse()
        .map_err(|e: super::UnknownGender| ValidationError(e.to_string()))
}

/// Parse an optional client-supplied date, defaulting to `fallback`.
pub fn date_or(
    field: &str,
    value: Option<&str>,
    fallback: DateTime<Utc>,
) -> ValidationResult<DateTime<Utc>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_timestamp(v)
            .ok_or_else(|| ValidationError(format!("{} is not a valid date: {}", field, v))),
        None => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required("name", "  Ayesha ").unwrap(), "Ayesha");
        let err = required("name", "   ").unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn test_date_or() {
        let now = Utc::now();
        assert_eq!(date_or("donationDate", None, now).unwrap(), now);
        assert_eq!(date_or("donationDate", Some(""), now).unwrap(), now);
        assert!(date_or("donationDate", Some("2024-01-05"), now).is_ok());
        assert!(date_or("donationDate", Some("yesterday"), now).is_err());
    }
}
