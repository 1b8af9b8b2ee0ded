//! ABO/Rh donation compatibility and transfusion outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expiry::{freshness, Freshness};
use crate::models::{BloodGroup, Donation, Donor, Recipient, TransfusionStatus};

/// Whether blood from `donor` may be given to `recipient`.
pub fn is_compatible(donor: BloodGroup, recipient: BloodGroup) -> bool {
    donor.recipients().contains(&recipient)
}

/// Label-level check. Labels outside the eight groups are never compatible.
pub fn is_compatible_labels(donor: &str, recipient: &str) -> bool {
    match (donor.parse::<BloodGroup>(), recipient.parse::<BloodGroup>()) {
        (Ok(d), Ok(r)) => is_compatible(d, r),
        _ => false,
    }
}

/// Donor groups that may give to `recipient`, in table order.
pub fn compatible_donors(recipient: BloodGroup) -> Vec<BloodGroup> {
    BloodGroup::ALL
        .iter()
        .copied()
        .filter(|donor| is_compatible(*donor, recipient))
        .collect()
}

/// Most recent donation by `donor` of the donor's own blood group.
///
/// Donations with unparseable dates are ignored.
pub fn latest_donation<'a>(donor: &Donor, donations: &'a [Donation]) -> Option<&'a Donation> {
    donations
        .iter()
        .filter(|d| d.donor_id == donor.id && d.blood_group == donor.blood_group)
        .filter_map(|d| d.donated_at().map(|at| (at, d)))
        .max_by_key(|(at, _)| *at)
        .map(|(_, d)| d)
}

/// Rule for deriving a transfusion's status when it is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransfusionPolicy {
    /// Also fail transfusions whose donor's latest donation has expired.
    pub check_expiry: bool,
}

impl Default for TransfusionPolicy {
    fn default() -> Self {
        Self { check_expiry: true }
    }
}

impl TransfusionPolicy {
    pub fn compatibility_only() -> Self {
        Self {
            check_expiry: false,
        }
    }

    /// Derive the status of a transfusion from `donor` to `recipient`.
    ///
    /// `donations` may hold any donations; only the donor's own are
    /// considered. A donor with no usable donation is not treated as expired.
    pub fn evaluate(
        &self,
        donor: &Donor,
        recipient: &Recipient,
        donations: &[Donation],
        reference: DateTime<Utc>,
    ) -> TransfusionStatus {
        if !is_compatible(donor.blood_group, recipient.blood_group) {
            return TransfusionStatus::Failed;
        }

        if self.check_expiry {
            let expired = latest_donation(donor, donations)
                .map(|d| freshness(d, reference) == Some(Freshness::Expired))
                .unwrap_or(false);
            if expired {
                return TransfusionStatus::Failed;
            }
        }

        TransfusionStatus::Successful
    }
}
