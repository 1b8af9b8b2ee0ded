//! Domain models for the blood bank.

mod blood_group;
mod donation;
mod donor;
mod gender;
mod recipient;
mod request;
mod timestamp;
mod transfusion;
pub mod validation;

pub use blood_group::*;
pub use donation::*;
pub use donor::*;
pub use gender::*;
pub use recipient::*;
pub use request::*;
pub use timestamp::*;
pub use transfusion::*;
pub use validation::{ValidationError, ValidationResult};
