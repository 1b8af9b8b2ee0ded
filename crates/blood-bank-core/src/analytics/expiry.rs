//! Donation expiry classification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Donation;
pub use crate::models::SHELF_LIFE_DAYS;

/// Days before expiry at which a donation is flagged as expiring.
pub const WARNING_WINDOW_DAYS: i64 = 7;

/// Where a donation sits in its shelf life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freshness {
    Fresh,
    Expiring,
    Expired,
}

/// Expiring and expired donations, each in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpiryReport {
    pub expiring: Vec<Donation>,
    pub expired: Vec<Donation>,
}

/// Classify one donation by its age at `reference`.
///
/// Returns `None` when the donation date cannot be parsed.
pub fn freshness(donation: &Donation, reference: DateTime<Utc>) -> Option<Freshness> {
    let age = reference - donation.donated_at()?;

    if age >= Duration::days(SHELF_LIFE_DAYS) {
        Some(Freshness::Expired)
    } else if age >= Duration::days(SHELF_LIFE_DAYS - WARNING_WINDOW_DAYS) {
        Some(Freshness::Expiring)
    } else {
        Some(Freshness::Fresh)
    }
}

/// Partition donations into expiring and expired; fresh and undated ones are dropped.
pub fn classify(donations: &[Donation], reference: DateTime<Utc>) -> ExpiryReport {
    let mut report = ExpiryReport::default();

    for donation in donations {
        match freshness(donation, reference) {
            Some(Freshness::Expired) => report.expired.push(donation.clone()),
            Some(Freshness::Expiring) => report.expiring.push(donation.clone()),
            Some(Freshness::Fresh) | None => {}
        }
    }

    report
}
