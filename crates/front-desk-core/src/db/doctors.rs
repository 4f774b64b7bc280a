//! Doctor database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{stamp_display_id, Database};
use crate::ids::EntityKind;
use crate::models::Doctor;
use crate::store::StoreResult;

const DOCTOR_SELECT: &str = r#"
    SELECT doctor_id, first_name, last_name, specialization, phone_number, email, available
    FROM doctors
"#;

impl Database {
    /// Insert a doctor and return its generated identifier.
    pub fn insert_doctor(&self, doctor: &Doctor) -> StoreResult<String> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO doctors (first_name, last_name, specialization, phone_number, email, available)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                doctor.first_name,
                doctor.last_name,
                doctor.specialization,
                doctor.phone_number,
                doctor.email,
                doctor.available,
            ],
        )?;
        let doctor_id = stamp_display_id(&tx, "doctors", "doctor_id", EntityKind::Doctor)?;
        tx.commit()?;
        Ok(doctor_id)
    }

    /// Get a doctor by identifier.
    pub fn get_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        self.conn
            .query_row(
                &format!("{} WHERE doctor_id = ?1", DOCTOR_SELECT),
                [doctor_id],
                doctor_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List all doctors in identifier order.
    pub fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY seq", DOCTOR_SELECT))?;
        let rows = stmt.query_map([], doctor_from_row)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        doctor_id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        specialization: row.get(3)?,
        phone_number: row.get(4)?,
        email: row.get(5)?,
        available: row.get(6)?,
    })
}
