//! Domain models for the front desk.

mod doctor;
mod patient;
mod prescription;

pub use doctor::*;
pub use lab_test::*;
pub use patient::*;
pub use prescription::*;

pub use crate::lifecycle::{LabTestStatus, PatientStatus, PrescriptionStatus};
