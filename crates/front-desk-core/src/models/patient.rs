//! Patient models.

use chrono::{DateTime, Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::lifecycle::PatientStatus;

/// Gender choices offered by the registration form.
pub const GENDER_OPTIONS: [&str; 3] = ["Male", "Female", "Other"];

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Generated identifier (`PAT1001`)
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    /// Secondary lookup key. Not enforced unique.
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    /// Free-text medical history
    pub medical_history: Option<String>,
    /// Set once at creation
    pub registered_at: DateTime<Local>,
    /// Position in the consultation queue
    pub queue_number: u32,
    /// Calendar day the queue number belongs to
    pub queue_date: NaiveDate,
    pub status: PatientStatus,
}

impl Patient {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on `today`, if the date of birth is known.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        let dob = self.date_of_birth?;
        let mut years = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            years -= 1;
        }
        u32::try_from(years).ok()
    }
}

/// Registration form data for a new patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_history: Option<String>,
}

impl NewPatient {
    /// Create registration data with the required fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        gender: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth: None,
            gender: gender.into(),
            phone_number: phone_number.into(),
            email: None,
            address: None,
            emergency_contact: None,
            medical_history: None,
        }
    }

    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    /// Build the stored record. Status starts at `Registered`, queue number unset.
    /// Whether the gender is one the registration form offers.
    pub fn has_listed_gender(&self) -> bool {
        GENDER_OPTIONS.contains(&self.gender.as_str())
    }

    pub fn into_patient(self, patient_id: String) -> Patient {
        let now = Local::now();
        Patient {
            patient_id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            phone_number: self.phone_number,
            email: self.email,
            address: self.address,
            emergency_contact: self.emergency_contact,
            medical_history: self.medical_history,
            registered_at: now,
            queue_number: 0,
            queue_date: now.date_naive(),
            status: PatientStatus::Registered,
        }
    }
}
