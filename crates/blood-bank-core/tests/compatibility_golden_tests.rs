//! Golden tests for the donation compatibility table.
//!
//! Every donor/recipient pair is checked against the standard ABO/Rh matrix.

use blood_bank_core::analytics::{compatible_donors, is_compatible, is_compatible_labels};
use blood_bank_core::BloodGroup;

/// Test case from the donation matrix.
struct GoldenCase {
    donor: &'static str,
    recipients: &'static [&'static str],
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            donor: "O-",
            recipients: &["O-", "O+", "A-", "A+", "B-", "B+", "AB-", "AB+"],
        },
        GoldenCase {
            donor: "O+",
            recipients: &["O+", "A+", "B+", "AB+"],
        },
        GoldenCase {
            donor: "A-",
            recipients: &["A-", "A+", "AB-", "AB+"],
        },
        GoldenCase {
            donor: "A+",
            recipients: &["A+", "AB+"],
        },
        GoldenCase {
            donor: "B-",
            recipients: &["B-", "B+", "AB-", "AB+"],
        },
        GoldenCase {
            donor: "B+",
            recipients: &["B+", "AB+"],
        },
        GoldenCase {
            donor: "AB-",
            recipients: &["AB-", "AB+"],
        },
        GoldenCase {
            donor: "AB+",
            recipients: &["AB+"],
        },
    ]
}

#[test]
fn test_golden_matrix() {
    let mut failures = Vec::new();

    for case in get_golden_cases() {
        for recipient in BloodGroup::ALL {
            let expected = case.recipients.contains(&recipient.label());
            let actual = is_compatible_labels(case.donor, recipient.label());
            if expected != actual {
                failures.push(format!(
                    "{} -> {}: expected {}, got {}",
                    case.donor, recipient, expected, actual
                ));
            }
        }
    }

    assert!(failures.is_empty(), "Golden failures:\n{}", failures.join("\n"));
}

#[test]
fn test_known_pairs() {
    assert!(is_compatible(BloodGroup::ONegative, BloodGroup::AbPositive));
    assert!(!is_compatible(BloodGroup::APositive, BloodGroup::OPositive));
    assert!(!is_compatible_labels("A+", "Z"));
    assert!(!is_compatible_labels("", "A+"));
}

#[test]
fn test_universal_donor_and_recipient() {
    assert_eq!(compatible_donors(BloodGroup::AbPositive).len(), 8);
    assert_eq!(compatible_donors(BloodGroup::ONegative), vec![BloodGroup::ONegative]);
}
