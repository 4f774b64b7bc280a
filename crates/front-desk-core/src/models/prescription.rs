//! Prescription and medication models.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::lifecycle::PrescriptionStatus;

/// Frequency text that is not on the menu.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown frequency: {0}")]
pub struct UnknownFrequency(pub String);

/// Dosing frequency menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "Once daily")]
    OnceDaily,
    #[default]
    #[serde(rename = "Twice daily")]
    TwiceDaily,
    #[serde(rename = "Three times daily")]
    ThreeTimesDaily,
    #[serde(rename = "Four times daily")]
    FourTimesDaily,
    #[serde(rename = "As needed")]
    AsNeeded,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::OnceDaily,
        Frequency::TwiceDaily,
        Frequency::ThreeTimesDaily,
        Frequency::FourTimesDaily,
        Frequency::AsNeeded,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::OnceDaily => "Once daily",
            Frequency::TwiceDaily => "Twice daily",
            Frequency::ThreeTimesDaily => "Three times daily",
            Frequency::FourTimesDaily => "Four times daily",
            Frequency::AsNeeded => "As needed",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownFrequency(s.to_string()))
    }
}

/// One medication line on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub name: String,
    /// Free text, e.g. "500mg"
    pub dosage: String,
    pub frequency: Frequency,
    pub duration_days: u32,
    pub instructions: String,
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({} for {} days)",
            self.name, self.dosage, self.frequency, self.duration_days
        )
    }
}

/// A prescription written during a consultation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// Generated identifier (`PRES0001`)
    pub prescription_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub prescribed_at: DateTime<Local>,
    pub diagnosis: String,
    /// Ordered medication lines
    pub medications: Vec<Medication>,
    pub instructions: String,
    pub status: PrescriptionStatus,
}

/// Prescription data before an identifier is assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPrescription {
    pub patient_id: String,
    /// Falls back to the default attending doctor when absent
    pub doctor_id: Option<String>,
    pub diagnosis: String,
    pub medications: Vec<Medication>,
    pub instructions: String,
}

impl NewPrescription {
    pub fn new(patient_id: impl Into<String>, diagnosis: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            doctor_id: None,
            diagnosis: diagnosis.into(),
            medications: Vec::new(),
            instructions: String::new(),
        }
    }

    pub fn with_medication(mut self, medication: Medication) -> Self {
        self.medications.push(medication);
        self
    }

    pub fn into_prescription(self, prescription_id: String, doctor_id: String) -> Prescription {
        Prescription {
            prescription_id,
            patient_id: self.patient_id,
            doctor_id,
            prescribed_at: Local::now(),
            diagnosis: self.diagnosis,
            medications: self.medications,
            instructions: self.instructions,
            status: PrescriptionStatus::Prescribed,
        }
    }
}
