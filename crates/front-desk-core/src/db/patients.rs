//! Patient database operations.

use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_status, stamp_display_id, Database};
use crate::ids::EntityKind;
use crate::models::{Patient, PatientStatus};
use crate::store::{StoreError, StoreResult};

const PATIENT_SELECT: &str = r#"
    SELECT patient_id, first_name, last_name, date_of_birth, gender, phone_number,
           email, address, emergency_contact, medical_history, registered_at,
           queue_number, queue_date, status
    FROM patients
"#;

impl Database {
    /// Insert a new patient and return its generated identifier.
    pub fn insert_patient(&self, patient: &Patient) -> StoreResult<String> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO patients (
                first_name, last_name, date_of_birth, gender, phone_number, email,
                address, emergency_contact, medical_history, registered_at,
                queue_number, queue_date, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                patient.first_name,
                patient.last_name,
                patient.date_of_birth,
                patient.gender,
                patient.phone_number,
                patient.email,
                patient.address,
                patient.emergency_contact,
                patient.medical_history,
                patient.registered_at,
                patient.queue_number,
                patient.queue_date,
                patient.status.as_str(),
            ],
        )?;
        let patient_id = stamp_display_id(&tx, "patients", "patient_id", EntityKind::Patient)?;
        tx.commit()?;
        Ok(patient_id)
    }

    /// Update an existing patient. The registration timestamp never changes.
    pub fn update_patient(&self, patient: &Patient) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                first_name = ?2,
                last_name = ?3,
                date_of_birth = ?4,
                gender = ?5,
                phone_number = ?6,
                email = ?7,
                address = ?8,
                emergency_contact = ?9,
                medical_history = ?10,
                queue_number = ?11,
                queue_date = ?12,
                status = ?13,
                updated_at = datetime('now')
            WHERE patient_id = ?1
            "#,
            params![
                patient.patient_id,
                patient.first_name,
                patient.last_name,
                patient.date_of_birth,
                patient.gender,
                patient.phone_number,
                patient.email,
                patient.address,
                patient.emergency_contact,
                patient.medical_history,
                patient.queue_number,
                patient.queue_date,
                patient.status.as_str(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Set a patient's status. Zero rows updated is an error.
    pub fn update_patient_status(&self, patient_id: &str, status: PatientStatus) -> StoreResult<()> {
        let rows_affected = self.conn.execute(
            "UPDATE patients SET status = ?1, updated_at = datetime('now') WHERE patient_id = ?2",
            params![status.as_str(), patient_id],
        )?;
        if rows_affected == 0 {
            return Err(StoreError::NotFound(format!("patient {}", patient_id)));
        }
        Ok(())
    }

    /// Get a patient by identifier.
    pub fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("{} WHERE patient_id = ?1", PATIENT_SELECT),
                [patient_id],
                PatientRow::from_row,
            )
            .optional()?
            .map(Patient::try_from)
            .transpose()
    }

    /// Get the first patient registered with a phone number.
    pub fn get_patient_by_phone(&self, phone_number: &str) -> StoreResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("{} WHERE phone_number = ?1 ORDER BY seq LIMIT 1", PATIENT_SELECT),
                [phone_number],
                PatientRow::from_row,
            )
            .optional()?
            .map(Patient::try_from)
            .transpose()
    }

    /// List all patients, most recently registered first.
    pub fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        self.query_patients(&format!(
            "{} ORDER BY registered_at DESC, seq DESC",
            PATIENT_SELECT
        ))
    }

    /// List patients in the consultation queue.
    pub fn list_waiting_patients(&self) -> StoreResult<Vec<Patient>> {
        self.query_patients(&format!(
            "{} WHERE status IN ('WAITING', 'REGISTERED')
             ORDER BY queue_date, queue_number, registered_at",
            PATIENT_SELECT
        ))
    }

    /// Next queue number for `date`: one past the highest number queued that day.
    pub fn next_queue_number(&self, date: NaiveDate) -> StoreResult<u32> {
        let next: u32 = self.conn.query_row(
            "SELECT COALESCE(MAX(queue_number), 0) + 1 FROM patients WHERE queue_date = ?1",
            [date],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, patient_id: &str) -> StoreResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE patient_id = ?1", [patient_id])?;
        Ok(rows_affected > 0)
    }

    fn query_patients(&self, sql: &str) -> StoreResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], PatientRow::from_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    patient_id: String,
    first_name: String,
    last_name: String,
    date_of_birth: Option<NaiveDate>,
    gender: String,
    phone_number: String,
    email: Option<String>,
    address: Option<String>,
    emergency_contact: Option<String>,
    medical_history: Option<String>,
    registered_at: DateTime<Local>,
    queue_number: u32,
    queue_date: NaiveDate,
    status: String,
}

impl PatientRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            patient_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            date_of_birth: row.get(3)?,
            gender: row.get(4)?,
            phone_number: row.get(5)?,
            email: row.get(6)?,
            address: row.get(7)?,
            emergency_contact: row.get(8)?,
            medical_history: row.get(9)?,
            registered_at: row.get(10)?,
            queue_number: row.get(11)?,
            queue_date: row.get(12)?,
            status: row.get(13)?,
        })
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = StoreError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        Ok(Patient {
            status: parse_status("patient", &row.status)?,
            patient_id: row.patient_id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            phone_number: row.phone_number,
            email: row.email,
            address: row.address,
            emergency_contact: row.emergency_contact,
            medical_history: row.medical_history,
            registered_at: row.registered_at,
            queue_number: row.queue_number,
            queue_date: row.queue_date,
        })
    }
}
