//! Lab test database operations.

use chrono::{DateTime, Local};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_status, stamp_display_id, Database};
use crate::ids::EntityKind;
use crate::models::LabTest;
use crate::store::{StoreError, StoreResult};

const LAB_TEST_SELECT: &str = r#"
    SELECT test_id, patient_id, test_type, description, ordered_at,
           completed_at, results, status, ordered_by
    FROM lab_tests
"#;

impl Database {
    /// Insert a lab test and return its generated identifier.
    pub fn insert_lab_test(&self, test: &LabTest) -> StoreResult<String> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO lab_tests (
                patient_id, test_type, description, ordered_at,
                completed_at, results, status, ordered_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                test.patient_id,
                test.test_type,
                test.description,
                test.ordered_at,
                test.completed_at,
                test.results,
                test.status.as_str(),
                test.ordered_by,
            ],
        )?;
        let test_id = stamp_display_id(&tx, "lab_tests", "test_id", EntityKind::LabTest)?;
        tx.commit()?;
        Ok(test_id)
    }

    /// Update an existing lab test.
    pub fn update_lab_test(&self, test: &LabTest) -> StoreResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE lab_tests SET
                description = ?2,
                completed_at = ?3,
                results = ?4,
                status = ?5
            WHERE test_id = ?1
            "#,
            params![
                test.test_id,
                test.description,
                test.completed_at,
                test.results,
                test.status.as_str(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a lab test by identifier.
    pub fn get_lab_test(&self, test_id: &str) -> StoreResult<Option<LabTest>> {
        self.conn
            .query_row(
                &format!("{} WHERE test_id = ?1", LAB_TEST_SELECT),
                [test_id],
                LabTestRow::from_row,
            )
            .optional()?
            .map(LabTest::try_from)
            .transpose()
    }

    /// List tests that are ordered or in progress, oldest first.
    pub fn list_pending_lab_tests(&self) -> StoreResult<Vec<LabTest>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE status IN ('ORDERED', 'IN_PROGRESS') ORDER BY ordered_at, seq",
            LAB_TEST_SELECT
        ))?;
        let rows = stmt.query_map([], LabTestRow::from_row)?;

        let mut tests = Vec::new();
        for row in rows {
            tests.push(row?.try_into()?);
        }
        Ok(tests)
    }

    /// List all tests for a patient, oldest first.
    pub fn list_lab_tests_for_patient(&self, patient_id: &str) -> StoreResult<Vec<LabTest>> {
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE patient_id = ?1 ORDER BY ordered_at, seq",
            LAB_TEST_SELECT
        ))?;
        let rows = stmt.query_map([patient_id], LabTestRow::from_row)?;

        let mut tests = Vec::new();
        for row in rows {
            tests.push(row?.try_into()?);
        }
        Ok(tests)
    }
}

/// Intermediate row struct for database mapping.
struct LabTestRow {
    test_id: String,
    patient_id: String,
    test_type: String,
    description: String,
    ordered_at: DateTime<Local>,
    completed_at: Option<DateTime<Local>>,
    results: Option<String>,
    status: String,
    ordered_by: String,
}

impl LabTestRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            test_id: row.get(0)?,
            patient_id: row.get(1)?,
            test_type: row.get(2)?,
            description: row.get(3)?,
            ordered_at: row.get(4)?,
            completed_at: row.get(5)?,
            results: row.get(6)?,
            status: row.get(7)?,
            ordered_by: row.get(8)?,
        })
    }
}

impl TryFrom<LabTestRow> for LabTest {
    type Error = StoreError;

    fn try_from(row: LabTestRow) -> Result<Self, Self::Error> {
        Ok(LabTest {
            status: parse_status("lab test", &row.status)?,
            test_id: row.test_id,
            patient_id: row.patient_id,
            test_type: row.test_type,
            description: row.description,
            ordered_at: row.ordered_at,
            completed_at: row.completed_at,
            results: row.results,
            ordered_by: row.ordered_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LabOrder, LabTestStatus};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_test(patient_id: &str) -> LabTest {
        let mut order = LabOrder::new(patient_id, "Urinalysis");
        order.description = "Fasting sample".into();
        order.into_lab_test(String::new(), "DOC001".into())
    }

    #[test]
    fn test_insert_and_get() {
        let db = setup_db();
        let test_id = db.insert_lab_test(&make_test("PAT0001")).unwrap();
        assert_eq!(test_id, "TEST0001");

        let retrieved = db.get_lab_test(&test_id).unwrap().unwrap();
        assert_eq!(retrieved.test_type, "Urinalysis");
        assert_eq!(retrieved.description, "Fasting sample");
        assert_eq!(retrieved.status, LabTestStatus::Ordered);
        assert!(retrieved.completed_at.is_none());
        assert!(retrieved.results.is_none());
    }

    #[test]
    fn test_complete_and_pending_list() {
        let db = setup_db();
        let first_id = db.insert_lab_test(&make_test("PAT0001")).unwrap();
        db.insert_lab_test(&make_test("PAT0002")).unwrap();
        assert_eq!(db.list_pending_lab_tests().unwrap().len(), 2);

        let mut first = db.get_lab_test(&first_id).unwrap().unwrap();
        first.status = LabTestStatus::Completed;
        first.results = Some("Normal".into());
        first.completed_at = Some(Local::now());
        assert!(db.update_lab_test(&first).unwrap());

        let pending = db.list_pending_lab_tests().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].patient_id, "PAT0002");

        let done = db.get_lab_test(&first_id).unwrap().unwrap();
        assert_eq!(done.results, Some("Normal".into()));
        assert!(done.completed_at.is_some());
    }

    #[test]
    fn test_list_for_patient() {
        let db = setup_db();
        db.insert_lab_test(&make_test("PAT0001")).unwrap();
        db.insert_lab_test(&make_test("PAT0001")).unwrap();
        db.insert_lab_test(&make_test("PAT0002")).unwrap();

        let tests = db.list_lab_tests_for_patient("PAT0001").unwrap();
        let ids: Vec<_> = tests.iter().map(|t| t.test_id.as_str()).collect();
        assert_eq!(ids, vec!["TEST0001", "TEST0002"]);
    }
}
