//! ABO/Rh blood groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eight ABO/Rh blood groups.
///
/// Variant order follows the donation table (O- first, AB+ last), which is
/// also the ordering used for sorted outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "AB+")]
    AbPositive,
}

impl BloodGroup {
    /// All groups in table order.
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::ONegative,
        BloodGroup::OPositive,
        BloodGroup::ANegative,
        BloodGroup::APositive,
        BloodGroup::BNegative,
        BloodGroup::BPositive,
        BloodGroup::AbNegative,
        BloodGroup::AbPositive,
    ];

    /// Conventional label, e.g. `"AB+"`.
    pub fn label(&self) -> &'static str {
        match self {
            BloodGroup::ONegative => "O-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ANegative => "A-",
            BloodGroup::APositive => "A+",
            BloodGroup::BNegative => "B-",
            BloodGroup::BPositive => "B+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::AbPositive => "AB+",
        }
    }

    /// Groups this donor group may transfuse to.
    pub fn recipients(&self) -> &'static [BloodGroup] {
        use BloodGroup::*;
        match self {
            ONegative => &[
                ONegative, OPositive, ANegative, APositive, BNegative, BPositive, AbNegative,
                AbPositive,
            ],
            OPositive => &[OPositive, APositive, BPositive, AbPositive],
            ANegative => &[ANegative, APositive, AbNegative, AbPositive],
            APositive => &[APositive, AbPositive],
            BNegative => &[BNegative, BPositive, AbNegative, AbPositive],
            BPositive => &[BPositive, AbPositive],
            AbNegative => &[AbNegative, AbPositive],
            AbPositive => &[AbPositive],
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for labels outside the eight groups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown blood group: {0}")]
pub struct UnknownBloodGroup(pub String);

impl FromStr for BloodGroup {
    type Err = UnknownBloodGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        BloodGroup::ALL
            .iter()
            .copied()
            .find(|group| group.label() == trimmed)
            .ok_or_else(|| UnknownBloodGroup(s.to_string()))
    }
}
