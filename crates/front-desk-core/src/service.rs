//! Hospital front desk service.
//!
//! One [`HospitalService`] is built at startup and passed to every entry
//! point. It owns the record store, checks each patient transition against
//! the lifecycle table before writing anything, and logs every state change.
//!
//! Writes are not rolled back: when a lab test or prescription has been
//! stored and the follow-up status update fails, the record stays.

use std::path::Path;

use chrono::Local;
use thiserror::Error;

use crate::config::{DeskConfig, StoreBackend};
use crate::db::Database;
use crate::export::{LabReport, MedicationLabels};
use crate::lifecycle::{LabTestStatus, LifecycleError, PatientEvent, PrescriptionStatus};
use crate::models::{
    seed_doctors, Doctor, LabOrder, LabTest, NewPatient, NewPrescription, Patient,
    PatientStatus, Prescription, DEFAULT_ATTENDING_DOCTOR,
};
use crate::queue::QueuePolicy;
use crate::store::{MemoryStore, RecordStore, StoreError};

/// Service errors.
#[derive(Error, Debug)]
pub enum HospitalError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type HospitalResult<T> = Result<T, HospitalError>;

/// Front desk operations over a single record store.
pub struct HospitalService {
    store: Box<dyn RecordStore + Send>,
}

impl HospitalService {
    /// Wrap a store, inserting the seed doctors if it has none.
    pub fn new(store: Box<dyn RecordStore + Send>) -> HospitalResult<Self> {
        Self::with_store(store, true)
    }

    /// Build the store named by `config`.
    pub fn from_config(config: &DeskConfig) -> HospitalResult<Self> {
        let store: Box<dyn RecordStore + Send> = match config.backend() {
            StoreBackend::InMemory => Box::new(MemoryStore::new()),
            StoreBackend::Sqlite(path) => Box::new(Database::open(path)?),
        };
        Self::with_store(store, config.seed_doctors())
    }

    pub fn in_memory() -> HospitalResult<Self> {
        Self::from_config(&DeskConfig::in_memory())
    }

    pub fn open<P: AsRef<Path>>(path: P) -> HospitalResult<Self> {
        Self::from_config(&DeskConfig::sqlite(path.as_ref()))
    }

    fn with_store(store: Box<dyn RecordStore + Send>, seed: bool) -> HospitalResult<Self> {
        let mut service = Self { store };
        if seed && service.store.list_doctors()?.is_empty() {
            for doctor in seed_doctors() {
                let doctor = service.store.insert_doctor(doctor.into_doctor(String::new()))?;
                tracing::info!(doctor_id = %doctor.doctor_id, "seeded doctor");
            }
        }
        Ok(service)
    }

    pub fn queue_policy(&self) -> QueuePolicy {
        self.store.queue_policy()
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Register a patient and put them in today's queue.
    pub fn register_patient(&mut self, new_patient: NewPatient) -> HospitalResult<Patient> {
        let mut patient = new_patient.into_patient(String::new());
        patient.queue_number = self.store.next_queue_number(patient.queue_date)?;
        patient.status = patient.status.apply(PatientEvent::QueueEntered)?;

        let patient = self.store.insert_patient(patient)?;
        tracing::info!(
            patient_id = %patient.patient_id,
            queue_number = patient.queue_number,
            "registered patient"
        );
        Ok(patient)
    }

    /// Give a returning patient a fresh queue number for today.
    ///
    /// Only a COMPLETED (or never queued REGISTERED) patient can rejoin the
    /// queue. A patient still WAITING, WITH_DOCTOR, IN_LAB or
    /// PRESCRIPTION_READY is rejected with an invalid transition and keeps
    /// their queue number.
    pub fn requeue_patient(&mut self, patient_id: &str) -> HospitalResult<Patient> {
        let mut patient = self
            .store
            .get_patient(patient_id)?
            .ok_or_else(|| HospitalError::NotFound(format!("patient {}", patient_id)))?;

        patient.status = patient.status.apply(PatientEvent::QueueEntered)?;
        patient.queue_date = Local::now().date_naive();
        patient.queue_number = self.store.next_queue_number(patient.queue_date)?;

        if !self.store.update_patient(&patient)? {
            return Err(HospitalError::NotFound(format!("patient {}", patient_id)));
        }
        tracing::info!(patient_id, queue_number = patient.queue_number, "patient requeued");
        Ok(patient)
    }

    pub fn find_patient_by_id(&self, patient_id: &str) -> HospitalResult<Option<Patient>> {
        Ok(self.store.get_patient(patient_id)?)
    }

    /// First patient registered with this phone number. Absence is not an error.
    pub fn find_patient_by_phone(&self, phone_number: &str) -> HospitalResult<Option<Patient>> {
        Ok(self.store.find_patient_by_phone(phone_number)?)
    }

    /// All patients, most recently registered first.
    pub fn all_patients(&self) -> HospitalResult<Vec<Patient>> {
        Ok(self.store.list_patients()?)
    }

    /// Consultation queue in call order.
    pub fn waiting_patients(&self) -> HospitalResult<Vec<Patient>> {
        Ok(self.store.list_waiting_patients()?)
    }

    /// Move the head of the queue to the doctor. `None` when the queue is empty.
    pub fn call_next_patient(&mut self) -> HospitalResult<Option<Patient>> {
        let Some(mut patient) = self.store.list_waiting_patients()?.into_iter().next() else {
            tracing::info!("consultation queue is empty");
            return Ok(None);
        };

        patient.status = patient.status.apply(PatientEvent::CalledByDoctor)?;
        self.set_status(&patient.patient_id, patient.status)?;
        Ok(Some(patient))
    }

    /// Close a consultation that needed no lab work or prescription.
    pub fn complete_consultation(&mut self, patient_id: &str) -> HospitalResult<()> {
        let status = self.check_transition(patient_id, PatientEvent::ConsultationClosed)?;
        self.set_status(patient_id, status)
    }

    /// Remove a patient record. Lab tests and prescriptions are left alone.
    pub fn delete_patient(&mut self, patient_id: &str) -> HospitalResult<bool> {
        let deleted = self.store.delete_patient(patient_id)?;
        if deleted {
            tracing::info!(patient_id, "deleted patient");
        } else {
            tracing::warn!(patient_id, "delete requested for unknown patient");
        }
        Ok(deleted)
    }

    // =========================================================================
    // Doctors
    // =========================================================================

    pub fn all_doctors(&self) -> HospitalResult<Vec<Doctor>> {
        Ok(self.store.list_doctors()?)
    }

    pub fn find_doctor_by_id(&self, doctor_id: &str) -> HospitalResult<Option<Doctor>> {
        Ok(self.store.get_doctor(doctor_id)?)
    }

    // =========================================================================
    // Lab tests
    // =========================================================================

    /// Order a test and send the patient to the lab.
    pub fn order_lab_test(&mut self, order: LabOrder) -> HospitalResult<LabTest> {
        let status = self.check_transition(&order.patient_id, PatientEvent::LabOrdered)?;

        let ordered_by = order
            .ordered_by
            .clone()
            .unwrap_or_else(|| DEFAULT_ATTENDING_DOCTOR.to_string());
        let test = self
            .store
            .insert_lab_test(order.into_lab_test(String::new(), ordered_by))?;
        tracing::info!(
            test_id = %test.test_id,
            patient_id = %test.patient_id,
            test_type = %test.test_type,
            "ordered lab test"
        );

        self.set_status(&test.patient_id, status)?;
        Ok(test)
    }

    /// Tests ordered or in progress, oldest first.
    pub fn pending_lab_tests(&self) -> HospitalResult<Vec<LabTest>> {
        Ok(self.store.list_pending_lab_tests()?)
    }

    pub fn lab_tests_for_patient(&self, patient_id: &str) -> HospitalResult<Vec<LabTest>> {
        Ok(self.store.list_lab_tests_for_patient(patient_id)?)
    }

    pub fn find_lab_test(&self, test_id: &str) -> HospitalResult<Option<LabTest>> {
        Ok(self.store.get_lab_test(test_id)?)
    }

    /// Mark a test as in progress.
    pub fn start_lab_test(&mut self, test_id: &str) -> HospitalResult<LabTest> {
        let mut test = self.require_lab_test(test_id)?;
        test.status = test.status.advance_to(LabTestStatus::InProgress)?;
        self.write_lab_test(&test)?;
        tracing::info!(test_id, "lab test started");
        Ok(test)
    }

    /// Store results on a pending test without completing it.
    ///
    /// Leaves a test with results but no completion, which the lab screen
    /// allows so work can be saved midway. Neither the test status nor the
    /// patient status changes. Completed tests keep the results they were
    /// completed with.
    pub fn save_lab_results(&mut self, test_id: &str, results: &str) -> HospitalResult<LabTest> {
        let mut test = self.require_lab_test(test_id)?;
        if !test.status.is_pending() {
            return Err(HospitalError::InvalidInput(format!(
                "lab test {} is already completed",
                test_id
            )));
        }
        test.results = Some(results.trim().to_string());
        self.write_lab_test(&test)?;
        tracing::info!(test_id, status = %test.status, "saved lab results");
        Ok(test)
    }

    /// Record results, complete the test and send the patient back to the queue.
    pub fn complete_lab_test(&mut self, test_id: &str, results: &str) -> HospitalResult<LabTest> {
        if results.trim().is_empty() {
            return Err(HospitalError::InvalidInput(
                "lab results cannot be empty".into(),
            ));
        }

        let mut test = self.require_lab_test(test_id)?;
        test.status = test.status.advance_to(LabTestStatus::Completed)?;
        let status = self.check_transition(&test.patient_id, PatientEvent::LabCompleted)?;

        test.results = Some(results.trim().to_string());
        test.completed_at = Some(Local::now());
        self.write_lab_test(&test)?;
        tracing::info!(test_id, patient_id = %test.patient_id, "completed lab test");

        self.set_status(&test.patient_id, status)?;
        Ok(test)
    }

    /// Printout for a test that has results.
    pub fn lab_report(&self, test_id: &str) -> HospitalResult<LabReport> {
        let test = self.require_lab_test(test_id)?;
        let patient = self.store.get_patient(&test.patient_id)?;
        LabReport::new(&test, patient.as_ref()).ok_or_else(|| {
            HospitalError::InvalidInput(format!("lab test {} has no results to print", test_id))
        })
    }

    // =========================================================================
    // Prescriptions
    // =========================================================================

    /// Write a prescription and mark the patient ready for the pharmacy.
    pub fn create_prescription(
        &mut self,
        new_prescription: NewPrescription,
    ) -> HospitalResult<Prescription> {
        if new_prescription.diagnosis.trim().is_empty() {
            return Err(HospitalError::InvalidInput(
                "diagnosis cannot be empty".into(),
            ));
        }
        if new_prescription.medications.is_empty() {
            return Err(HospitalError::InvalidInput(
                "prescription needs at least one medication".into(),
            ));
        }

        let status =
            self.check_transition(&new_prescription.patient_id, PatientEvent::PrescriptionCreated)?;

        let doctor_id = new_prescription
            .doctor_id
            .clone()
            .unwrap_or_else(|| DEFAULT_ATTENDING_DOCTOR.to_string());
        let prescription = self
            .store
            .insert_prescription(new_prescription.into_prescription(String::new(), doctor_id))?;
        tracing::info!(
            prescription_id = %prescription.prescription_id,
            patient_id = %prescription.patient_id,
            medications = prescription.medications.len(),
            "created prescription"
        );

        self.set_status(&prescription.patient_id, status)?;
        Ok(prescription)
    }

    /// Prescriptions awaiting the pharmacy, oldest first.
    pub fn pending_prescriptions(&self) -> HospitalResult<Vec<Prescription>> {
        Ok(self.store.list_pending_prescriptions()?)
    }

    pub fn prescriptions_for_patient(&self, patient_id: &str) -> HospitalResult<Vec<Prescription>> {
        Ok(self.store.list_prescriptions_for_patient(patient_id)?)
    }

    pub fn find_prescription(&self, prescription_id: &str) -> HospitalResult<Option<Prescription>> {
        Ok(self.store.get_prescription(prescription_id)?)
    }

    /// Hand the medication over and complete the patient's visit.
    pub fn dispense_prescription(&mut self, prescription_id: &str) -> HospitalResult<Prescription> {
        let mut prescription = self.require_prescription(prescription_id)?;
        prescription.status = prescription.status.advance_to(PrescriptionStatus::Dispensed)?;
        let status =
            self.check_transition(&prescription.patient_id, PatientEvent::PrescriptionDispensed)?;

        if !self.store.update_prescription(&prescription)? {
            return Err(HospitalError::NotFound(format!(
                "prescription {}",
                prescription_id
            )));
        }
        tracing::info!(
            prescription_id,
            patient_id = %prescription.patient_id,
            "dispensed prescription"
        );

        self.set_status(&prescription.patient_id, status)?;
        Ok(prescription)
    }

    /// Label sheet for every medication on a prescription.
    pub fn medication_labels(&self, prescription_id: &str) -> HospitalResult<MedicationLabels> {
        let prescription = self.require_prescription(prescription_id)?;
        let patient = self.store.get_patient(&prescription.patient_id)?;
        Ok(MedicationLabels::new(&prescription, patient.as_ref()))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Status the patient moves to on `event`.
    ///
    /// An unknown patient passes with the event's nominal target; the store
    /// then decides what a status update on a missing record means.
    fn check_transition(
        &self,
        patient_id: &str,
        event: PatientEvent,
    ) -> HospitalResult<PatientStatus> {
        match self.store.get_patient(patient_id)? {
            Some(patient) => Ok(patient.status.apply(event)?),
            None => Ok(event.target()),
        }
    }

    fn set_status(&mut self, patient_id: &str, status: PatientStatus) -> HospitalResult<()> {
        if self.store.update_patient_status(patient_id, status)? {
            tracing::info!(patient_id, %status, "patient status changed");
        }
        Ok(())
    }

    fn require_lab_test(&self, test_id: &str) -> HospitalResult<LabTest> {
        self.store
            .get_lab_test(test_id)?
            .ok_or_else(|| HospitalError::NotFound(format!("lab test {}", test_id)))
    }

    fn write_lab_test(&mut self, test: &LabTest) -> HospitalResult<()> {
        if !self.store.update_lab_test(test)? {
            return Err(HospitalError::NotFound(format!("lab test {}", test.test_id)));
        }
        Ok(())
    }

    fn require_prescription(&self, prescription_id: &str) -> HospitalResult<Prescription> {
        self.store
            .get_prescription(prescription_id)?
            .ok_or_else(|| HospitalError::NotFound(format!("prescription {}", prescription_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Medication};
    use chrono::NaiveDate;

    fn setup_service() -> HospitalService {
        HospitalService::in_memory().unwrap()
    }

    fn jane() -> NewPatient {
        NewPatient::new("Jane", "Doe", "Female", "555-0100")
            .with_date_of_birth(NaiveDate::from_ymd_opt(1985, 3, 2).unwrap())
    }

    fn john() -> NewPatient {
        NewPatient::new("John", "Roe", "Male", "555-0101")
    }

    fn amoxicillin() -> Medication {
        Medication {
            name: "Amoxicillin".into(),
            dosage: "500mg".into(),
            frequency: Frequency::ThreeTimesDaily,
            duration_days: 7,
            instructions: "Take with food".into(),
        }
    }

    fn status_of(service: &HospitalService, patient_id: &str) -> PatientStatus {
        service.find_patient_by_id(patient_id).unwrap().unwrap().status
    }

    #[test]
    fn test_seeds_doctors_once() {
        let service = setup_service();
        let doctors = service.all_doctors().unwrap();
        assert_eq!(doctors.len(), 3);
        assert_eq!(doctors[0].doctor_id, "DOC001");
        assert_eq!(
            service.find_doctor_by_id("DOC003").unwrap().unwrap().specialization,
            "Pediatrics"
        );
    }

    #[test]
    fn test_config_can_skip_seed() {
        let config = DeskConfig::in_memory().without_seed_doctors();
        let service = HospitalService::from_config(&config).unwrap();
        assert!(service.all_doctors().unwrap().is_empty());
    }

    #[test]
    fn test_register_and_call_next() {
        let mut service = setup_service();
        assert_eq!(service.queue_policy(), QueuePolicy::RunningCounter);

        let jane = service.register_patient(jane()).unwrap();
        assert_eq!(jane.patient_id, "PAT1001");
        assert_eq!(jane.queue_number, 1);
        assert_eq!(jane.status, PatientStatus::Waiting);

        let john = service.register_patient(john()).unwrap();
        assert_eq!(john.queue_number, 2);

        let called = service.call_next_patient().unwrap().unwrap();
        assert_eq!(called.patient_id, "PAT1001");
        assert_eq!(status_of(&service, "PAT1001"), PatientStatus::WithDoctor);

        let waiting: Vec<_> = service
            .waiting_patients()
            .unwrap()
            .into_iter()
            .map(|p| p.patient_id)
            .collect();
        assert_eq!(waiting, vec!["PAT1002"]);
    }

    #[test]
    fn test_call_next_on_empty_queue() {
        let mut service = setup_service();
        assert!(service.call_next_patient().unwrap().is_none());
    }

    #[test]
    fn test_lab_round_trip() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();

        let test = service
            .order_lab_test(LabOrder::new(&patient.patient_id, "Urinalysis"))
            .unwrap();
        assert_eq!(test.test_id, "TEST0001");
        assert_eq!(test.ordered_by, DEFAULT_ATTENDING_DOCTOR);
        assert_eq!(status_of(&service, &patient.patient_id), PatientStatus::InLab);
        assert_eq!(service.pending_lab_tests().unwrap().len(), 1);

        let done = service.complete_lab_test(&test.test_id, "Normal").unwrap();
        assert_eq!(done.status, LabTestStatus::Completed);
        assert!(done.completed_at.is_some());
        assert_eq!(status_of(&service, &patient.patient_id), PatientStatus::Waiting);
        assert!(service.pending_lab_tests().unwrap().is_empty());

        let report = service.lab_report(&test.test_id).unwrap();
        assert_eq!(report.patient_name, "Jane Doe");
        assert_eq!(report.results, "Normal");
    }

    #[test]
    fn test_complete_lab_requires_results() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();
        let test = service
            .order_lab_test(LabOrder::new(&patient.patient_id, "ECG"))
            .unwrap();

        let result = service.complete_lab_test(&test.test_id, "   ");
        assert!(matches!(result, Err(HospitalError::InvalidInput(_))));
        assert_eq!(status_of(&service, &patient.patient_id), PatientStatus::InLab);
    }

    #[test]
    fn test_save_results_without_completing() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();
        let test = service
            .order_lab_test(LabOrder::new(&patient.patient_id, "ECG"))
            .unwrap();

        service.start_lab_test(&test.test_id).unwrap();
        let saved = service.save_lab_results(&test.test_id, "Sinus rhythm").unwrap();
        assert_eq!(saved.status, LabTestStatus::InProgress);
        assert_eq!(saved.results.as_deref(), Some("Sinus rhythm"));
        assert!(saved.completed_at.is_none());
        assert_eq!(status_of(&service, &patient.patient_id), PatientStatus::InLab);
        assert_eq!(service.pending_lab_tests().unwrap().len(), 1);
    }

    #[test]
    fn test_completed_test_cannot_restart() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();
        let test = service
            .order_lab_test(LabOrder::new(&patient.patient_id, "ECG"))
            .unwrap();
        service.complete_lab_test(&test.test_id, "Normal").unwrap();

        let result = service.start_lab_test(&test.test_id);
        assert!(matches!(
            result,
            Err(HospitalError::Lifecycle(LifecycleError::LabTestRegression { .. }))
        ));
    }

    #[test]
    fn test_completed_results_cannot_be_overwritten() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();
        let test = service
            .order_lab_test(LabOrder::new(&patient.patient_id, "ECG"))
            .unwrap();
        service.complete_lab_test(&test.test_id, "Normal").unwrap();

        let result = service.save_lab_results(&test.test_id, "");
        assert!(matches!(result, Err(HospitalError::InvalidInput(_))));

        let stored = service.find_lab_test(&test.test_id).unwrap().unwrap();
        assert_eq!(stored.status, LabTestStatus::Completed);
        assert_eq!(stored.results.as_deref(), Some("Normal"));
        assert_eq!(service.lab_report(&test.test_id).unwrap().results, "Normal");
    }

    #[test]
    fn test_results_are_trimmed() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();
        let test = service
            .order_lab_test(LabOrder::new(&patient.patient_id, "Lipid Profile"))
            .unwrap();

        let saved = service
            .save_lab_results(&test.test_id, "  LDL 110\n")
            .unwrap();
        assert_eq!(saved.results.as_deref(), Some("LDL 110"));

        let done = service
            .complete_lab_test(&test.test_id, "\tLDL 105  ")
            .unwrap();
        assert_eq!(done.results.as_deref(), Some("LDL 105"));
    }

    #[test]
    fn test_prescription_round_trip() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();

        let prescription = service
            .create_prescription(
                NewPrescription::new(&patient.patient_id, "Bronchitis")
                    .with_medication(amoxicillin()),
            )
            .unwrap();
        assert_eq!(prescription.prescription_id, "PRES0001");
        assert_eq!(prescription.doctor_id, DEFAULT_ATTENDING_DOCTOR);
        assert_eq!(
            status_of(&service, &patient.patient_id),
            PatientStatus::PrescriptionReady
        );

        let dispensed = service
            .dispense_prescription(&prescription.prescription_id)
            .unwrap();
        assert_eq!(dispensed.status, PrescriptionStatus::Dispensed);
        assert_eq!(status_of(&service, &patient.patient_id), PatientStatus::Completed);
        assert!(service.pending_prescriptions().unwrap().is_empty());

        let labels = service
            .medication_labels(&prescription.prescription_id)
            .unwrap();
        assert_eq!(labels.labels.len(), 1);
    }

    #[test]
    fn test_prescription_validation() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();

        let no_diagnosis = NewPrescription::new(&patient.patient_id, " ").with_medication(amoxicillin());
        assert!(matches!(
            service.create_prescription(no_diagnosis),
            Err(HospitalError::InvalidInput(_))
        ));

        let no_medication = NewPrescription::new(&patient.patient_id, "Bronchitis");
        assert!(matches!(
            service.create_prescription(no_medication),
            Err(HospitalError::InvalidInput(_))
        ));
        assert!(service.pending_prescriptions().unwrap().is_empty());
    }

    #[test]
    fn test_transition_checked_before_write() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();

        // Still WAITING; the doctor never called them
        let result = service.order_lab_test(LabOrder::new(&patient.patient_id, "ECG"));
        assert!(matches!(
            result,
            Err(HospitalError::Lifecycle(LifecycleError::InvalidTransition { .. }))
        ));
        assert!(service.pending_lab_tests().unwrap().is_empty());
        assert_eq!(status_of(&service, &patient.patient_id), PatientStatus::Waiting);
    }

    #[test]
    fn test_double_dispense_rejected() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();
        let prescription = service
            .create_prescription(
                NewPrescription::new(&patient.patient_id, "Bronchitis")
                    .with_medication(amoxicillin()),
            )
            .unwrap();
        service
            .dispense_prescription(&prescription.prescription_id)
            .unwrap();

        let again = service.dispense_prescription(&prescription.prescription_id);
        assert!(matches!(
            again,
            Err(HospitalError::Lifecycle(LifecycleError::PrescriptionRegression { .. }))
        ));
    }

    #[test]
    fn test_complete_consultation_and_requeue() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        service.call_next_patient().unwrap();
        service.complete_consultation(&patient.patient_id).unwrap();
        assert_eq!(status_of(&service, &patient.patient_id), PatientStatus::Completed);
        assert!(service.waiting_patients().unwrap().is_empty());

        let requeued = service.requeue_patient(&patient.patient_id).unwrap();
        assert_eq!(requeued.status, PatientStatus::Waiting);
        assert_eq!(requeued.queue_number, 2);
        assert_eq!(service.waiting_patients().unwrap().len(), 1);
    }

    #[test]
    fn test_requeue_unknown_patient() {
        let mut service = setup_service();
        assert!(matches!(
            service.requeue_patient("PAT4040"),
            Err(HospitalError::NotFound(_))
        ));
    }

    #[test]
    fn test_requeue_rejected_while_visit_open() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        assert!(matches!(
            service.requeue_patient(&patient.patient_id),
            Err(HospitalError::Lifecycle(LifecycleError::InvalidTransition { .. }))
        ));

        service.call_next_patient().unwrap();
        service
            .order_lab_test(LabOrder::new(&patient.patient_id, "ECG"))
            .unwrap();
        assert!(service.requeue_patient(&patient.patient_id).is_err());
        assert_eq!(status_of(&service, &patient.patient_id), PatientStatus::InLab);
        assert_eq!(
            service.find_patient_by_id(&patient.patient_id).unwrap().unwrap().queue_number,
            1
        );
    }

    #[test]
    fn test_unknown_patient_transition_is_noop_in_memory() {
        let mut service = setup_service();
        service.complete_consultation("PAT4040").unwrap();
        assert!(service.find_patient_by_id("PAT4040").unwrap().is_none());
    }

    #[test]
    fn test_unknown_phone_is_absent() {
        let mut service = setup_service();
        service.register_patient(jane()).unwrap();
        assert!(service.find_patient_by_phone("555-9999").unwrap().is_none());
        assert_eq!(
            service.find_patient_by_phone("555-0100").unwrap().unwrap().patient_id,
            "PAT1001"
        );
    }

    #[test]
    fn test_delete_patient() {
        let mut service = setup_service();
        let patient = service.register_patient(jane()).unwrap();
        assert!(service.delete_patient(&patient.patient_id).unwrap());
        assert!(!service.delete_patient(&patient.patient_id).unwrap());

        let next = service.register_patient(john()).unwrap();
        assert_eq!(next.patient_id, "PAT1002");
    }
}
