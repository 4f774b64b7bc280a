//! Record store boundary.
//!
//! A store persists patients, doctors, lab tests and prescriptions, assigns
//! their identifiers and hands out queue numbers. Two implementations exist:
//!
//! - [`MemoryStore`]: hash maps keyed by identifier, running queue counter.
//! - [`Database`](crate::db::Database): SQLite tables, daily queue count.
//!
//! Pick one per deployment. They produce identifiers of the same shape but
//! not the same numeric sequence.

mod memory;

pub use memory::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{Doctor, LabTest, Patient, PatientStatus, Prescription};
use crate::queue::QueuePolicy;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations used by the hospital service.
///
/// `insert_*` methods ignore the identifier on the record they are given,
/// assign a fresh one and return the stored record.
pub trait RecordStore {
    /// Queue numbering policy this store implements.
    fn queue_policy(&self) -> QueuePolicy;

    /// Next queue number for a patient queued on `date`.
    fn next_queue_number(&mut self, date: NaiveDate) -> StoreResult<u32>;

    // Patients

    fn insert_patient(&mut self, patient: Patient) -> StoreResult<Patient>;

    /// Overwrite a stored patient. Returns false when no such patient exists.
    fn update_patient(&mut self, patient: &Patient) -> StoreResult<bool>;

    /// Set a patient's status. Returns whether a patient was changed.
    ///
    /// A missing patient is a logged no-op (`Ok(false)`) for the in-memory
    /// store and a [`StoreError::NotFound`] for SQLite.
    fn update_patient_status(&mut self, patient_id: &str, status: PatientStatus)
        -> StoreResult<bool>;

    fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>>;

    /// First patient registered with this phone number.
    fn find_patient_by_phone(&self, phone_number: &str) -> StoreResult<Option<Patient>>;

    /// All patients, most recently registered first.
    fn list_patients(&self) -> StoreResult<Vec<Patient>>;

    /// Patients in `WAITING` or `REGISTERED`, ascending by queue number.
    fn list_waiting_patients(&self) -> StoreResult<Vec<Patient>>;

    fn delete_patient(&mut self, patient_id: &str) -> StoreResult<bool>;

    // Doctors

    fn insert_doctor(&mut self, doctor: Doctor) -> StoreResult<Doctor>;

    fn get_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>>;

    fn list_doctors(&self) -> StoreResult<Vec<Doctor>>;

    // Lab tests

    fn insert_lab_test(&mut self, test: LabTest) -> StoreResult<LabTest>;

    fn update_lab_test(&mut self, test: &LabTest) -> StoreResult<bool>;

    fn get_lab_test(&self, test_id: &str) -> StoreResult<Option<LabTest>>;

    /// Tests that are `ORDERED` or `IN_PROGRESS`, oldest order first.
    fn list_pending_lab_tests(&self) -> StoreResult<Vec<LabTest>>;

    fn list_lab_tests_for_patient(&self, patient_id: &str) -> StoreResult<Vec<LabTest>>;

    // Prescriptions

    fn insert_prescription(&mut self, prescription: Prescription) -> StoreResult<Prescription>;

    fn update_prescription(&mut self, prescription: &Prescription) -> StoreResult<bool>;

    fn get_prescription(&self, prescription_id: &str) -> StoreResult<Option<Prescription>>;

    /// Prescriptions still `PRESCRIBED`, oldest first.
    fn list_pending_prescriptions(&self) -> StoreResult<Vec<Prescription>>;

    fn list_prescriptions_for_patient(&self, patient_id: &str) -> StoreResult<Vec<Prescription>>;
}
