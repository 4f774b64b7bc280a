//! In-memory record store.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::{RecordStore, StoreResult};
use crate::ids::{EntityKind, IdGenerator};
use crate::models::{Doctor, LabTest, Patient, PatientStatus, Prescription, PrescriptionStatus};
use crate::queue::{sort_by_queue, QueuePolicy, RunningCounter};

/// Hash-map store. State lives for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: HashMap<String, Patient>,
    doctors: HashMap<String, Doctor>,
    lab_tests: HashMap<String, LabTest>,
    prescriptions: HashMap<String, Prescription>,
    ids: IdGenerator,
    queue: RunningCounter,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn queue_policy(&self) -> QueuePolicy {
        QueuePolicy::RunningCounter
    }

    fn next_queue_number(&mut self, _date: NaiveDate) -> StoreResult<u32> {
        Ok(self.queue.next())
    }

    fn insert_patient(&mut self, mut patient: Patient) -> StoreResult<Patient> {
        patient.patient_id = self.ids.next_id(EntityKind::Patient);
        self.patients
            .insert(patient.patient_id.clone(), patient.clone());
        Ok(patient)
    }

    fn update_patient(&mut self, patient: &Patient) -> StoreResult<bool> {
        match self.patients.get_mut(&patient.patient_id) {
            Some(stored) => {
                let registered_at = stored.registered_at;
                *stored = patient.clone();
                stored.registered_at = registered_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_patient_status(
        &mut self,
        patient_id: &str,
        status: PatientStatus,
    ) -> StoreResult<bool> {
        match self.patients.get_mut(patient_id) {
            Some(patient) => {
                patient.status = status;
                Ok(true)
            }
            None => {
                tracing::warn!(patient_id, %status, "status update for unknown patient ignored");
                Ok(false)
            }
        }
    }

    fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>> {
        Ok(self.patients.get(patient_id).cloned())
    }

    fn find_patient_by_phone(&self, phone_number: &str) -> StoreResult<Option<Patient>> {
        Ok(self
            .patients
            .values()
            .filter(|p| p.phone_number == phone_number)
            .min_by(|a, b| a.registered_at.cmp(&b.registered_at))
            .cloned())
    }

    fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        let mut patients: Vec<Patient> = self.patients.values().cloned().collect();
        patients.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        Ok(patients)
    }

    fn list_waiting_patients(&self) -> StoreResult<Vec<Patient>> {
        let mut waiting: Vec<Patient> = self
            .patients
            .values()
            .filter(|p| p.status.is_waiting())
            .cloned()
            .collect();
        sort_by_queue(&mut waiting);
        Ok(waiting)
    }

    fn delete_patient(&mut self, patient_id: &str) -> StoreResult<bool> {
        Ok(self.patients.remove(patient_id).is_some())
    }

    fn insert_doctor(&mut self, mut doctor: Doctor) -> StoreResult<Doctor> {
        doctor.doctor_id = self.ids.next_id(EntityKind::Doctor);
        self.doctors.insert(doctor.doctor_id.clone(), doctor.clone());
        Ok(doctor)
    }

    fn get_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        Ok(self.doctors.get(doctor_id).cloned())
    }

    fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        let mut doctors: Vec<Doctor> = self.doctors.values().cloned().collect();
        doctors.sort_by(|a, b| a.doctor_id.cmp(&b.doctor_id));
        Ok(doctors)
    }

    fn insert_lab_test(&mut self, mut test: LabTest) -> StoreResult<LabTest> {
        test.test_id = self.ids.next_id(EntityKind::LabTest);
        self.lab_tests.insert(test.test_id.clone(), test.clone());
        Ok(test)
    }

    fn update_lab_test(&mut self, test: &LabTest) -> StoreResult<bool> {
        match self.lab_tests.get_mut(&test.test_id) {
            Some(stored) => {
                *stored = test.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_lab_test(&self, test_id: &str) -> StoreResult<Option<LabTest>> {
        Ok(self.lab_tests.get(test_id).cloned())
    }

    fn list_pending_lab_tests(&self) -> StoreResult<Vec<LabTest>> {
        Ok(sorted_tests(
            self.lab_tests.values().filter(|t| t.status.is_pending()),
        ))
    }

    fn list_lab_tests_for_patient(&self, patient_id: &str) -> StoreResult<Vec<LabTest>> {
        Ok(sorted_tests(
            self.lab_tests.values().filter(|t| t.patient_id == patient_id),
        ))
    }

    fn insert_prescription(&mut self, mut prescription: Prescription) -> StoreResult<Prescription> {
        prescription.prescription_id = self.ids.next_id(EntityKind::Prescription);
        self.prescriptions
            .insert(prescription.prescription_id.clone(), prescription.clone());
        Ok(prescription)
    }

    fn update_prescription(&mut self, prescription: &Prescription) -> StoreResult<bool> {
        match self.prescriptions.get_mut(&prescription.prescription_id) {
            Some(stored) => {
                *stored = prescription.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_prescription(&self, prescription_id: &str) -> StoreResult<Option<Prescription>> {
        Ok(self.prescriptions.get(prescription_id).cloned())
    }

    fn list_pending_prescriptions(&self) -> StoreResult<Vec<Prescription>> {
        Ok(sorted_prescriptions(
            self.prescriptions
                .values()
                .filter(|p| p.status == PrescriptionStatus::Prescribed),
        ))
    }

    fn list_prescriptions_for_patient(&self, patient_id: &str) -> StoreResult<Vec<Prescription>> {
        Ok(sorted_prescriptions(
            self.prescriptions
                .values()
                .filter(|p| p.patient_id == patient_id),
        ))
    }
}

fn sorted_tests<'a>(tests: impl Iterator<Item = &'a LabTest>) -> Vec<LabTest> {
    let mut tests: Vec<LabTest> = tests.cloned().collect();
    tests.sort_by(|a, b| {
        a.ordered_at
            .cmp(&b.ordered_at)
            .then_with(|| a.test_id.cmp(&b.test_id))
    });
    tests
}

fn sorted_prescriptions<'a>(
    prescriptions: impl Iterator<Item = &'a Prescription>,
) -> Vec<Prescription> {
    let mut prescriptions: Vec<Prescription> = prescriptions.cloned().collect();
    prescriptions.sort_by(|a, b| {
        a.prescribed_at
            .cmp(&b.prescribed_at)
            .then_with(|| a.prescription_id.cmp(&b.prescription_id))
    });
    prescriptions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{seed_doctors, LabOrder, NewPatient};
    use chrono::Local;

    fn setup_store() -> MemoryStore {
        MemoryStore::new()
    }

    fn new_patient(first: &str, phone: &str) -> Patient {
        NewPatient::new(first, "Doe", "Female", phone).into_patient(String::new())
    }

    #[test]
    fn test_insert_assigns_patient_ids() {
        let mut store = setup_store();
        let first = store.insert_patient(new_patient("Jane", "555-0100")).unwrap();
        let second = store.insert_patient(new_patient("John", "555-0101")).unwrap();
        assert_eq!(first.patient_id, "PAT1001");
        assert_eq!(second.patient_id, "PAT1002");
        assert_eq!(
            store.get_patient("PAT1001").unwrap().unwrap().first_name,
            "Jane"
        );
    }

    #[test]
    fn test_queue_counter_ignores_date() {
        let mut store = setup_store();
        let today = Local::now().date_naive();
        let tomorrow = today.succ_opt().unwrap();
        assert_eq!(store.next_queue_number(today).unwrap(), 1);
        assert_eq!(store.next_queue_number(tomorrow).unwrap(), 2);
        assert_eq!(store.queue_policy(), QueuePolicy::RunningCounter);
    }

    #[test]
    fn test_find_by_phone() {
        let mut store = setup_store();
        store.insert_patient(new_patient("Jane", "555-0100")).unwrap();
        let found = store.find_patient_by_phone("555-0100").unwrap().unwrap();
        assert_eq!(found.first_name, "Jane");
        assert!(store.find_patient_by_phone("555-9999").unwrap().is_none());
    }

    #[test]
    fn test_status_update_on_unknown_patient_is_noop() {
        let mut store = setup_store();
        assert!(!store
            .update_patient_status("PAT9999", PatientStatus::Completed)
            .unwrap());
        assert!(store.list_patients().unwrap().is_empty());
    }

    #[test]
    fn test_waiting_list_sorted_and_filtered() {
        let mut store = setup_store();
        for (i, name) in ["A", "B", "C"].iter().enumerate() {
            let mut p = new_patient(name, &format!("555-010{}", i));
            p.queue_number = 3 - i as u32;
            p.status = PatientStatus::Waiting;
            store.insert_patient(p).unwrap();
        }
        assert!(store
            .update_patient_status("PAT1002", PatientStatus::WithDoctor)
            .unwrap());

        let waiting = store.list_waiting_patients().unwrap();
        let queue: Vec<u32> = waiting.iter().map(|p| p.queue_number).collect();
        assert_eq!(queue, vec![1, 3]);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = setup_store();
        let first = store.insert_patient(new_patient("Jane", "1")).unwrap();
        assert!(store.delete_patient(&first.patient_id).unwrap());
        let second = store.insert_patient(new_patient("John", "2")).unwrap();
        assert_eq!(second.patient_id, "PAT1002");
    }

    #[test]
    fn test_doctors_in_id_order() {
        let mut store = setup_store();
        for doctor in seed_doctors() {
            store.insert_doctor(doctor.into_doctor(String::new())).unwrap();
        }
        let ids: Vec<_> = store
            .list_doctors()
            .unwrap()
            .into_iter()
            .map(|d| d.doctor_id)
            .collect();
        assert_eq!(ids, vec!["DOC001", "DOC002", "DOC003"]);
    }

    #[test]
    fn test_pending_lab_tests() {
        let mut store = setup_store();
        let test = store
            .insert_lab_test(
                LabOrder::new("PAT1001", "ECG").into_lab_test(String::new(), "DOC001".into()),
            )
            .unwrap();
        assert_eq!(test.test_id, "TEST0001");
        assert_eq!(store.list_pending_lab_tests().unwrap().len(), 1);

        let mut done = test.clone();
        done.status = crate::models::LabTestStatus::Completed;
        assert!(store.update_lab_test(&done).unwrap());
        assert!(store.list_pending_lab_tests().unwrap().is_empty());
        assert_eq!(store.list_lab_tests_for_patient("PAT1001").unwrap().len(), 1);
    }
}
