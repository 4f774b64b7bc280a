//! Front Desk Core Library
//!
//! Hospital front desk: patient registration, the doctor consultation queue,
//! laboratory orders and results, and pharmacy dispensing.
//!
//! # Patient flow
//!
//! ```text
//!   register ──▶ WAITING ──call next──▶ WITH_DOCTOR ──close──────────────┐
//!                  ▲                      │        │                     │
//!                  │          order lab   │        │ prescribe           │
//!                  │                      ▼        ▼                     ▼
//!                  └── results ───── IN_LAB    PRESCRIPTION_READY ──▶ COMPLETED
//!                                                         dispense
//! ```
//!
//! # Stores
//!
//! Pick one per deployment:
//!
//! - [`MemoryStore`]: ids `PAT1001…`, running queue counter
//! - [`Database`]: SQLite, ids from the row key (`PAT0001…`), queue restarts daily
//!
//! # Modules
//!
//! - [`ids`]: identifier formatting and generation
//! - [`queue`]: queue numbering policies
//! - [`lifecycle`]: patient, lab test and prescription state machines
//! - [`models`]: domain types
//! - [`store`]: the record store boundary and the in-memory store
//! - [`db`]: SQLite store
//! - [`service`]: the front desk operations
//! - [`export`]: lab report and medication label printouts
//! - [`config`]: startup configuration

pub mod config;
pub mod db;
pub mod export;
pub mod ids;
pub mod lifecycle;
pub mod models;
pub mod queue;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::{DeskConfig, StoreBackend};
pub use db::Database;
pub use export::{LabReport, MedicationLabels};
pub use lifecycle::{LifecycleError, PatientEvent};
pub use models::{
    Doctor, Frequency, LabOrder, LabTest, LabTestStatus, Medication, NewPatient,
    NewPrescription, Patient, PatientStatus, Prescription, PrescriptionStatus,
};
pub use queue::QueuePolicy;
pub use service::{HospitalError, HospitalResult, HospitalService};
pub use store::{MemoryStore, RecordStore, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FrontDeskError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<HospitalError> for FrontDeskError {
    fn from(e: HospitalError) -> Self {
        match e {
            HospitalError::Store(StoreError::NotFound(what)) | HospitalError::NotFound(what) => {
                FrontDeskError::NotFound(what)
            }
            HospitalError::Store(StoreError::Json(e)) => e.into(),
            HospitalError::Store(e) => FrontDeskError::DatabaseError(e.to_string()),
            HospitalError::Lifecycle(e) => FrontDeskError::InvalidTransition(e.to_string()),
            HospitalError::InvalidInput(msg) => FrontDeskError::InvalidInput(msg),
        }
    }
}

impl From<serde_json::Error> for FrontDeskError {
    fn from(e: serde_json::Error) -> Self {
        FrontDeskError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for FrontDeskError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        FrontDeskError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a front desk backed by the SQLite file at `path`.
#[uniffi::export]
pub fn open_desk(path: String) -> Result<Arc<FrontDesk>, FrontDeskError> {
    let service = HospitalService::open(&path)?;
    Ok(Arc::new(FrontDesk {
        service: Arc::new(Mutex::new(service)),
    }))
}

/// Create a front desk that keeps everything in memory.
#[uniffi::export]
pub fn open_desk_in_memory() -> Result<Arc<FrontDesk>, FrontDeskError> {
    let service = HospitalService::in_memory()?;
    Ok(Arc::new(FrontDesk {
        service: Arc::new(Mutex::new(service)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe service wrapper for FFI.
#[derive(uniffi::Object)]
pub struct FrontDesk {
    service: Arc<Mutex<HospitalService>>,
}

#[uniffi::export]
impl FrontDesk {
    // =========================================================================
    // Reception
    // =========================================================================

    /// Register a patient and queue them.
    pub fn register_patient(&self, patient: FfiNewPatient) -> Result<FfiPatient, FrontDeskError> {
        let new_patient = NewPatient::try_from(patient)?;
        let mut service = self.service.lock()?;
        Ok(service.register_patient(new_patient)?.into())
    }

    /// Give a returning patient a new queue number.
    pub fn requeue_patient(&self, patient_id: String) -> Result<FfiPatient, FrontDeskError> {
        let mut service = self.service.lock()?;
        Ok(service.requeue_patient(&patient_id)?.into())
    }

    pub fn find_patient_by_id(
        &self,
        patient_id: String,
    ) -> Result<Option<FfiPatient>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.find_patient_by_id(&patient_id)?.map(|p| p.into()))
    }

    pub fn find_patient_by_phone(
        &self,
        phone_number: String,
    ) -> Result<Option<FfiPatient>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.find_patient_by_phone(&phone_number)?.map(|p| p.into()))
    }

    /// All patients, most recently registered first.
    pub fn all_patients(&self) -> Result<Vec<FfiPatient>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.all_patients()?.into_iter().map(|p| p.into()).collect())
    }

    pub fn delete_patient(&self, patient_id: String) -> Result<bool, FrontDeskError> {
        let mut service = self.service.lock()?;
        Ok(service.delete_patient(&patient_id)?)
    }

    // =========================================================================
    // Consultation
    // =========================================================================

    /// Consultation queue in call order.
    pub fn waiting_patients(&self) -> Result<Vec<FfiPatient>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.waiting_patients()?.into_iter().map(|p| p.into()).collect())
    }

    pub fn call_next_patient(&self) -> Result<Option<FfiPatient>, FrontDeskError> {
        let mut service = self.service.lock()?;
        Ok(service.call_next_patient()?.map(|p| p.into()))
    }

    pub fn complete_consultation(&self, patient_id: String) -> Result<(), FrontDeskError> {
        let mut service = self.service.lock()?;
        service.complete_consultation(&patient_id)?;
        Ok(())
    }

    pub fn all_doctors(&self) -> Result<Vec<FfiDoctor>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.all_doctors()?.into_iter().map(|d| d.into()).collect())
    }

    pub fn find_doctor_by_id(&self, doctor_id: String) -> Result<Option<FfiDoctor>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.find_doctor_by_id(&doctor_id)?.map(|d| d.into()))
    }

    // =========================================================================
    // Laboratory
    // =========================================================================

    pub fn order_lab_test(
        &self,
        patient_id: String,
        test_type: String,
        description: String,
        ordered_by: Option<String>,
    ) -> Result<FfiLabTest, FrontDeskError> {
        let mut order = LabOrder::new(patient_id, test_type);
        order.description = description;
        order.ordered_by = ordered_by;

        let mut service = self.service.lock()?;
        Ok(service.order_lab_test(order)?.into())
    }

    pub fn pending_lab_tests(&self) -> Result<Vec<FfiLabTest>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.pending_lab_tests()?.into_iter().map(|t| t.into()).collect())
    }

    pub fn lab_tests_for_patient(&self, patient_id: String) -> Result<Vec<FfiLabTest>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service
            .lab_tests_for_patient(&patient_id)?
            .into_iter()
            .map(|t| t.into())
            .collect())
    }

    pub fn find_lab_test(&self, test_id: String) -> Result<Option<FfiLabTest>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.find_lab_test(&test_id)?.map(|t| t.into()))
    }

    pub fn start_lab_test(&self, test_id: String) -> Result<FfiLabTest, FrontDeskError> {
        let mut service = self.service.lock()?;
        Ok(service.start_lab_test(&test_id)?.into())
    }

    pub fn save_lab_results(
        &self,
        test_id: String,
        results: String,
    ) -> Result<FfiLabTest, FrontDeskError> {
        let mut service = self.service.lock()?;
        Ok(service.save_lab_results(&test_id, &results)?.into())
    }

    pub fn complete_lab_test(
        &self,
        test_id: String,
        results: String,
    ) -> Result<FfiLabTest, FrontDeskError> {
        let mut service = self.service.lock()?;
        Ok(service.complete_lab_test(&test_id, &results)?.into())
    }

    /// Lab result printout as plain text.
    pub fn lab_report_text(&self, test_id: String) -> Result<String, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.lab_report(&test_id)?.to_text())
    }

    // =========================================================================
    // Pharmacy
    // =========================================================================

    pub fn create_prescription(
        &self,
        prescription: FfiNewPrescription,
    ) -> Result<FfiPrescription, FrontDeskError> {
        let new_prescription = NewPrescription::try_from(prescription)?;
        let mut service = self.service.lock()?;
        Ok(service.create_prescription(new_prescription)?.into())
    }

    pub fn pending_prescriptions(&self) -> Result<Vec<FfiPrescription>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service
            .pending_prescriptions()?
            .into_iter()
            .map(|p| p.into())
            .collect())
    }

    pub fn find_prescription(
        &self,
        prescription_id: String,
    ) -> Result<Option<FfiPrescription>, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.find_prescription(&prescription_id)?.map(|p| p.into()))
    }

    pub fn dispense_prescription(
        &self,
        prescription_id: String,
    ) -> Result<FfiPrescription, FrontDeskError> {
        let mut service = self.service.lock()?;
        Ok(service.dispense_prescription(&prescription_id)?.into())
    }

    /// Medication labels as JSON.
    pub fn medication_labels_json(&self, prescription_id: String) -> Result<String, FrontDeskError> {
        let service = self.service.lock()?;
        Ok(service.medication_labels(&prescription_id)?.to_json()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe registration form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPatient {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub gender: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub medical_history: Option<String>,
}

impl TryFrom<FfiNewPatient> for NewPatient {
    type Error = FrontDeskError;

    fn try_from(form: FfiNewPatient) -> Result<Self, Self::Error> {
        let date_of_birth = form
            .date_of_birth
            .as_deref()
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                    FrontDeskError::InvalidInput(format!("Invalid date of birth: {}", s))
                })
            })
            .transpose()?;

        Ok(NewPatient {
            first_name: form.first_name,
            last_name: form.last_name,
            date_of_birth,
            gender: form.gender,
            phone_number: form.phone_number,
            email: form.email,
            address: form.address,
            emergency_contact: form.emergency_contact,
            medical_history: form.medical_history,
        })
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub patient_id: String,
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub gender: String,
    pub phone_number: String,
    pub registered_at: String,
    pub queue_number: u32,
    pub status: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            full_name: patient.full_name(),
            patient_id: patient.patient_id,
            date_of_birth: patient.date_of_birth.map(|d| d.to_string()),
            gender: patient.gender,
            phone_number: patient.phone_number,
            registered_at: patient.registered_at.to_rfc3339(),
            queue_number: patient.queue_number,
            status: patient.status.to_string(),
        }
    }
}

/// FFI-safe doctor.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoctor {
    pub doctor_id: String,
    pub display_name: String,
    pub specialization: String,
    pub phone_number: String,
    pub email: String,
    pub available: bool,
}

impl From<Doctor> for FfiDoctor {
    fn from(doctor: Doctor) -> Self {
        Self {
            display_name: doctor.to_string(),
            doctor_id: doctor.doctor_id,
            specialization: doctor.specialization,
            phone_number: doctor.phone_number,
            email: doctor.email,
            available: doctor.available,
        }
    }
}

/// FFI-safe lab test.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabTest {
    pub test_id: String,
    pub patient_id: String,
    pub test_type: String,
    pub description: String,
    pub ordered_at: String,
    pub completed_at: Option<String>,
    pub results: Option<String>,
    pub status: String,
    pub ordered_by: String,
}

impl From<LabTest> for FfiLabTest {
    fn from(test: LabTest) -> Self {
        Self {
            test_id: test.test_id,
            patient_id: test.patient_id,
            test_type: test.test_type,
            description: test.description,
            ordered_at: test.ordered_at.to_rfc3339(),
            completed_at: test.completed_at.map(|t| t.to_rfc3339()),
            results: test.results,
            status: test.status.to_string(),
            ordered_by: test.ordered_by,
        }
    }
}

/// FFI-safe medication line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub name: String,
    pub dosage: String,
    /// Menu text, e.g. "Twice daily"
    pub frequency: String,
    pub duration_days: u32,
    pub instructions: String,
}

impl From<Medication> for FfiMedication {
    fn from(med: Medication) -> Self {
        Self {
            name: med.name,
            dosage: med.dosage,
            frequency: med.frequency.to_string(),
            duration_days: med.duration_days,
            instructions: med.instructions,
        }
    }
}

impl TryFrom<FfiMedication> for Medication {
    type Error = FrontDeskError;

    fn try_from(med: FfiMedication) -> Result<Self, Self::Error> {
        let frequency: Frequency = med
            .frequency
            .parse()
            .map_err(|e: models::UnknownFrequency| FrontDeskError::InvalidInput(e.to_string()))?;
        Ok(Medication {
            name: med.name,
            dosage: med.dosage,
            frequency,
            duration_days: med.duration_days,
            instructions: med.instructions,
        })
    }
}

/// FFI-safe prescription form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewPrescription {
    pub patient_id: String,
    pub doctor_id: Option<String>,
    pub diagnosis: String,
    pub medications: Vec<FfiMedication>,
    pub instructions: String,
}

impl TryFrom<FfiNewPrescription> for NewPrescription {
    type Error = FrontDeskError;

    fn try_from(form: FfiNewPrescription) -> Result<Self, Self::Error> {
        let medications = form
            .medications
            .into_iter()
            .map(Medication::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NewPrescription {
            patient_id: form.patient_id,
            doctor_id: form.doctor_id,
            diagnosis: form.diagnosis,
            medications,
            instructions: form.instructions,
        })
    }
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub prescription_id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub prescribed_at: String,
    pub diagnosis: String,
    pub medications: Vec<FfiMedication>,
    pub instructions: String,
    pub status: String,
}

impl From<Prescription> for FfiPrescription {
    fn from(prescription: Prescription) -> Self {
        Self {
            prescription_id: prescription.prescription_id,
            patient_id: prescription.patient_id,
            doctor_id: prescription.doctor_id,
            prescribed_at: prescription.prescribed_at.to_rfc3339(),
            diagnosis: prescription.diagnosis,
            medications: prescription
                .medications
                .into_iter()
                .map(|m| m.into())
                .collect(),
            instructions: prescription.instructions,
            status: prescription.status.to_string(),
        }
    }
}
