//! Doctor models and the seed roster.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Doctor credited on lab orders and prescriptions when the caller names none.
pub const DEFAULT_ATTENDING_DOCTOR: &str = "DOC001";

/// A doctor. Created once at startup and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    /// Generated identifier (`DOC001`)
    pub doctor_id: String,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub phone_number: String,
    pub email: String,
    /// Always true; nothing toggles it
    pub available: bool,
}

impl Doctor {
    /// "Dr. First Last".
    pub fn full_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_name(), self.specialization)
    }
}

/// Doctor data before an identifier is assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub phone_number: String,
    pub email: String,
}

impl NewDoctor {
    pub fn into_doctor(self, doctor_id: String) -> Doctor {
        Doctor {
            doctor_id,
            first_name: self.first_name,
            last_name: self.last_name,
            specialization: self.specialization,
            phone_number: self.phone_number,
            email: self.email,
            available: true,
        }
    }
}

/// The fixed roster inserted into an empty store, in id order.
pub fn seed_doctors() -> Vec<NewDoctor> {
    [
        ("John", "Smith", "General Medicine", "123-456-7890", "john.smith@hospital.com"),
        ("Sarah", "Johnson", "Cardiology", "123-456-7891", "sarah.johnson@hospital.com"),
        ("Michael", "Brown", "Pediatrics", "123-456-7892", "michael.brown@hospital.com"),
    ]
    .into_iter()
    .map(|(first, last, specialization, phone, email)| NewDoctor {
        first_name: first.into(),
        last_name: last.into(),
        specialization: specialization.into(),
        phone_number: phone.into(),
        email: email.into(),
    })
    .collect()
}
