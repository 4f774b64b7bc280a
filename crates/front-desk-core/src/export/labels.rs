//! Pharmacy medication labels.

use serde::{Deserialize, Serialize};

use crate::models::{Frequency, Patient, Prescription};

/// One label, stuck on one medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationLabel {
    pub patient_name: String,
    pub medication: String,
    pub dosage: String,
    pub frequency: Frequency,
    pub duration_days: u32,
    pub instructions: String,
}

/// Labels for every medication on a prescription, in prescription order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationLabels {
    pub prescription_id: String,
    pub labels: Vec<MedicationLabel>,
}

impl MedicationLabels {
    pub fn new(prescription: &Prescription, patient: Option<&Patient>) -> Self {
        let patient_name = patient
            .map(Patient::full_name)
            .unwrap_or_else(|| "Unknown".to_string());

        let labels = prescription
            .medications
            .iter()
            .map(|med| MedicationLabel {
                patient_name: patient_name.clone(),
                medication: med.name.clone(),
                dosage: med.dosage.clone(),
                frequency: med.frequency,
                duration_days: med.duration_days,
                instructions: med.instructions.clone(),
            })
            .collect();

        Self {
            prescription_id: prescription.prescription_id.clone(),
            labels,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text label sheet.
    pub fn to_text(&self) -> String {
        let mut text = String::from("Medication Labels:\n\n");

        for label in &self.labels {
            text.push_str("MEDICATION LABEL\n");
            text.push_str("================\n");
            text.push_str(&format!("Patient: {}\n", label.patient_name));
            text.push_str(&format!("Medication: {}\n", label.medication));
            text.push_str(&format!("Dosage: {}\n", label.dosage));
            text.push_str(&format!("Frequency: {}\n", label.frequency));
            text.push_str(&format!("Duration: {} days\n", label.duration_days));
            if !label.instructions.is_empty() {
                text.push_str(&format!("Instructions: {}\n", label.instructions));
            }
            text.push('\n');
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Medication, NewPatient, NewPrescription};

    fn prescription() -> Prescription {
        NewPrescription::new("PAT1001", "Bronchitis")
            .with_medication(Medication {
                name: "Amoxicillin".into(),
                dosage: "500mg".into(),
                frequency: Frequency::ThreeTimesDaily,
                duration_days: 7,
                instructions: "Take with food".into(),
            })
            .with_medication(Medication {
                name: "Paracetamol".into(),
                dosage: "1g".into(),
                frequency: Frequency::AsNeeded,
                duration_days: 3,
                instructions: String::new(),
            })
            .into_prescription("PRES0001".into(), "DOC001".into())
    }

    #[test]
    fn test_one_label_per_medication() {
        let patient = NewPatient::new("Jane", "Doe", "Female", "555-0100")
            .into_patient("PAT1001".into());
        let labels = MedicationLabels::new(&prescription(), Some(&patient));

        assert_eq!(labels.labels.len(), 2);
        assert_eq!(labels.labels[0].medication, "Amoxicillin");
        assert_eq!(labels.labels[1].patient_name, "Jane Doe");

        let text = labels.to_text();
        assert_eq!(text.matches("MEDICATION LABEL").count(), 2);
        assert!(text.contains("Frequency: Three times daily\n"));
        assert!(text.contains("Duration: 3 days\n"));
        assert_eq!(text.matches("Instructions:").count(), 1);
    }

    #[test]
    fn test_unknown_patient() {
        let labels = MedicationLabels::new(&prescription(), None);
        assert!(labels.labels.iter().all(|l| l.patient_name == "Unknown"));
    }
}
