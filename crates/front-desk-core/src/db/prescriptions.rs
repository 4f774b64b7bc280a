//! Prescription database operations.

use chrono::{DateTime, Local};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_status, stamp_display_id, Database};
use crate::ids::EntityKind;
use crate::models::{Medication, Prescription};
use crate::store::{StoreError, StoreResult};

const PRESCRIPTION_SELECT: &str = r#"
    SELECT prescription_id, patient_id, doctor_id, prescribed_at, diagnosis,
           medications, instructions, status
    FROM prescriptions
"#;

impl Database {
    /// Insert a prescription and return its generated identifier.
    pub fn insert_prescription(&self, prescription: &Prescription) -> StoreResult<String> {
        let medications_json = serde_json::to_string(&prescription.medications)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO prescriptions (
                patient_id, doctor_id, prescribed_at, diagnosis,
                medications, instructions, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                prescription.patient_id,
                prescription.doctor_id,
                prescription.prescribed_at,
                prescription.diagnosis,
                medications_json,
                prescription.instructions,
                prescription.status.as_str(),
            ],
        )?;
        let prescription_id = stamp_display_id(
            &tx,
            "prescriptions",
            "prescription_id",
            EntityKind::Prescription,
        )?;
        tx.commit()?;
        Ok(prescription_id)
    }

    /// Update an existing prescription.
    pub fn update_prescription(&self, prescription: &Prescription) -> StoreResult<bool> {
        let medications_json = serde_json::to_string(&prescription.medications)?;

        let rows_affected = self.conn.execute(
            r#"
            UPDATE prescriptions SET
                diagnosis = ?2,
                medications = ?3,
                instructions = ?4,
                status = ?5
            WHERE prescription_id = ?1
            "#,
            params![
                prescription.prescription_id,
                prescription.diagnosis,
                medications_json,
                prescription.instructions,
                prescription.status.as_str(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a prescription by identifier.
    pub fn get_prescription(&self, prescription_id: &str) -> StoreResult<Option<Prescription>> {
        self.conn
            .query_row(
                &format!("{} WHERE prescription_id = ?1", PRESCRIPTION_SELECT),
                [prescription_id],
                PrescriptionRow::from_row,
            )
            .optional()?
            .map(Prescription::try_from)
            .transpose()
    }

    /// List prescriptions awaiting the pharmacy, oldest first.
    pub fn list_pending_prescriptions(&self) -> StoreResult<Vec<Prescription>> {
        self.query_prescriptions(
            &format!(
                "{} WHERE status = 'PRESCRIBED' ORDER BY prescribed_at, seq",
                PRESCRIPTION_SELECT
            ),
            None,
        )
    }

    /// List all prescriptions for a patient, oldest first.
    pub fn list_prescriptions_for_patient(&self, patient_id: &str) -> StoreResult<Vec<Prescription>> {
        self.query_prescriptions(
            &format!(
                "{} WHERE patient_id = ?1 ORDER BY prescribed_at, seq",
                PRESCRIPTION_SELECT
            ),
            Some(patient_id),
        )
    }

    fn query_prescriptions(
        &self,
        sql: &str,
        patient_id: Option<&str>,
    ) -> StoreResult<Vec<Prescription>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match patient_id {
            Some(patient_id) => stmt.query_map([patient_id], PrescriptionRow::from_row)?,
            None => stmt.query_map([], PrescriptionRow::from_row)?,
        };

        let mut prescriptions = Vec::new();
        for row in rows {
            prescriptions.push(row?.try_into()?);
        }
        Ok(prescriptions)
    }
}

/// Intermediate row struct for database mapping.
struct PrescriptionRow {
    prescription_id: String,
    patient_id: String,
    doctor_id: String,
    prescribed_at: DateTime<Local>,
    diagnosis: String,
    medications: String,
    instructions: String,
    status: String,
}

impl PrescriptionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            prescription_id: row.get(0)?,
            patient_id: row.get(1)?,
            doctor_id: row.get(2)?,
            prescribed_at: row.get(3)?,
            diagnosis: row.get(4)?,
            medications: row.get(5)?,
            instructions: row.get(6)?,
            status: row.get(7)?,
        })
    }
}

impl TryFrom<PrescriptionRow> for Prescription {
    type Error = StoreError;

    fn try_from(row: PrescriptionRow) -> Result<Self, Self::Error> {
        let medications: Vec<Medication> = serde_json::from_str(&row.medications)?;

        Ok(Prescription {
            status: parse_status("prescription", &row.status)?,
            prescription_id: row.prescription_id,
            patient_id: row.patient_id,
            doctor_id: row.doctor_id,
            prescribed_at: row.prescribed_at,
            diagnosis: row.diagnosis,
            medications,
            instructions: row.instructions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, NewPrescription, PrescriptionStatus};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_prescription(patient_id: &str) -> Prescription {
        NewPrescription::new(patient_id, "Hypertension")
            .with_medication(Medication {
                name: "Amlodipine".into(),
                dosage: "5mg".into(),
                frequency: Frequency::OnceDaily,
                duration_days: 30,
                instructions: "Morning".into(),
            })
            .with_medication(Medication {
                name: "Aspirin".into(),
                dosage: "75mg".into(),
                frequency: Frequency::OnceDaily,
                duration_days: 30,
                instructions: String::new(),
            })
            .into_prescription(String::new(), "DOC002".into())
    }

    #[test]
    fn test_insert_and_get_keeps_medication_order() {
        let db = setup_db();
        let prescription_id = db.insert_prescription(&make_prescription("PAT0001")).unwrap();
        assert_eq!(prescription_id, "PRES0001");

        let retrieved = db.get_prescription(&prescription_id).unwrap().unwrap();
        assert_eq!(retrieved.doctor_id, "DOC002");
        assert_eq!(retrieved.medications.len(), 2);
        assert_eq!(retrieved.medications[0].name, "Amlodipine");
        assert_eq!(retrieved.medications[1].name, "Aspirin");
        assert_eq!(retrieved.status, PrescriptionStatus::Prescribed);
    }

    #[test]
    fn test_dispense_removes_from_pending() {
        let db = setup_db();
        let prescription_id = db.insert_prescription(&make_prescription("PAT0001")).unwrap();
        db.insert_prescription(&make_prescription("PAT0002")).unwrap();

        let mut prescription = db.get_prescription(&prescription_id).unwrap().unwrap();
        prescription.status = PrescriptionStatus::Dispensed;
        assert!(db.update_prescription(&prescription).unwrap());

        let pending = db.list_pending_prescriptions().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].patient_id, "PAT0002");
        assert_eq!(db.list_prescriptions_for_patient("PAT0001").unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_medications_column() {
        let db = setup_db();
        let prescription_id = db.insert_prescription(&make_prescription("PAT0001")).unwrap();
        db.conn()
            .execute(
                "UPDATE prescriptions SET medications = 'not json' WHERE prescription_id = ?1",
                [&prescription_id],
            )
            .unwrap();

        let result = db.get_prescription(&prescription_id);
        assert!(matches!(result, Err(StoreError::Json(_))));
    }
}
