//! Compatibility, expiry and aggregate analytics.
//!
//! Pure functions over record snapshots already read from the store. Nothing
//! here touches the database or keeps state between calls.

mod aggregation;
mod compatibility;
mod expiry;

pub use aggregation::*;
pub use compatibility::*;
pub use expiry::*;

/// Round to 2 decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
