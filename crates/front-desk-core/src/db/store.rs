//! [`RecordStore`] backed by SQLite.

use chrono::NaiveDate;

use super::Database;
use crate::models::{Doctor, LabTest, Patient, PatientStatus, Prescription};
use crate::queue::QueuePolicy;
use crate::store::{RecordStore, StoreResult};

impl RecordStore for Database {
    fn queue_policy(&self) -> QueuePolicy {
        QueuePolicy::DailyCount
    }

    fn next_queue_number(&mut self, date: NaiveDate) -> StoreResult<u32> {
        Database::next_queue_number(self, date)
    }

    fn insert_patient(&mut self, mut patient: Patient) -> StoreResult<Patient> {
        patient.patient_id = Database::insert_patient(self, &patient)?;
        Ok(patient)
    }

    fn update_patient(&mut self, patient: &Patient) -> StoreResult<bool> {
        Database::update_patient(self, patient)
    }

    fn update_patient_status(&mut self, patient_id: &str, status: PatientStatus) -> StoreResult<bool> {
        Database::update_patient_status(self, patient_id, status)?;
        Ok(true)
    }

    fn get_patient(&self, patient_id: &str) -> StoreResult<Option<Patient>> {
        Database::get_patient(self, patient_id)
    }

    fn find_patient_by_phone(&self, phone_number: &str) -> StoreResult<Option<Patient>> {
        self.get_patient_by_phone(phone_number)
    }

    fn list_patients(&self) -> StoreResult<Vec<Patient>> {
        Database::list_patients(self)
    }

    fn list_waiting_patients(&self) -> StoreResult<Vec<Patient>> {
        Database::list_waiting_patients(self)
    }

    fn delete_patient(&mut self, patient_id: &str) -> StoreResult<bool> {
        Database::delete_patient(self, patient_id)
    }

    fn insert_doctor(&mut self, mut doctor: Doctor) -> StoreResult<Doctor> {
        doctor.doctor_id = Database::insert_doctor(self, &doctor)?;
        Ok(doctor)
    }

    fn get_doctor(&self, doctor_id: &str) -> StoreResult<Option<Doctor>> {
        Database::get_doctor(self, doctor_id)
    }

    fn list_doctors(&self) -> StoreResult<Vec<Doctor>> {
        Database::list_doctors(self)
    }

    fn insert_lab_test(&mut self, mut test: LabTest) -> StoreResult<LabTest> {
        test.test_id = Database::insert_lab_test(self, &test)?;
        Ok(test)
    }

    fn update_lab_test(&mut self, test: &LabTest) -> StoreResult<bool> {
        Database::update_lab_test(self, test)
    }

    fn get_lab_test(&self, test_id: &str) -> StoreResult<Option<LabTest>> {
        Database::get_lab_test(self, test_id)
    }

    fn list_pending_lab_tests(&self) -> StoreResult<Vec<LabTest>> {
        Database::list_pending_lab_tests(self)
    }

    fn list_lab_tests_for_patient(&self, patient_id: &str) -> StoreResult<Vec<LabTest>> {
        Database::list_lab_tests_for_patient(self, patient_id)
    }

    fn insert_prescription(&mut self, mut prescription: Prescription) -> StoreResult<Prescription> {
        prescription.prescription_id = Database::insert_prescription(self, &prescription)?;
        Ok(prescription)
    }

    fn update_prescription(&mut self, prescription: &Prescription) -> StoreResult<bool> {
        Database::update_prescription(self, prescription)
    }

    fn get_prescription(&self, prescription_id: &str) -> StoreResult<Option<Prescription>> {
        Database::get_prescription(self, prescription_id)
    }

    fn list_pending_prescriptions(&self) -> StoreResult<Vec<Prescription>> {
        Database::list_pending_prescriptions(self)
    }

    fn list_prescriptions_for_patient(&self, patient_id: &str) -> StoreResult<Vec<Prescription>> {
        Database::list_prescriptions_for_patient(self, patient_id)
    }
}
