//! Printouts for the laboratory and the pharmacy.

mod labels;
mod lab_report;

pub use labels::*;
pub use lab_report::*;
