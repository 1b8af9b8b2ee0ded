//! Dashboard report and chart datasets.

mod charts;
mod report;

pub use charts::*;
pub use report::*;
