//! SQLite schema definition.

/// Complete database schema for the front desk.
///
/// Every table carries an `AUTOINCREMENT` surrogate key (`seq`); the display
/// identifier (`PAT0001`, `DOC001`, ...) is derived from it right after insert,
/// so a deleted row never gives its number back. Cross-table references
/// (patient, ordering doctor) are plain text and not enforced.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Doctors
-- ============================================================================

CREATE TABLE IF NOT EXISTS doctors (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    doctor_id TEXT UNIQUE,                       -- DOC + 3-digit seq
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    specialization TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    email TEXT NOT NULL,
    available INTEGER NOT NULL DEFAULT 1
);

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_id TEXT UNIQUE,                      -- PAT + 4-digit seq
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT,
    gender TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    email TEXT,
    address TEXT,
    emergency_contact TEXT,
    medical_history TEXT,
    registered_at TEXT NOT NULL,
    queue_number INTEGER NOT NULL,
    queue_date TEXT NOT NULL,                    -- YYYY-MM-DD the queue number belongs to
    status TEXT NOT NULL DEFAULT 'REGISTERED' CHECK (status IN (
        'REGISTERED', 'WAITING', 'WITH_DOCTOR', 'IN_LAB', 'PRESCRIPTION_READY', 'COMPLETED'
    )),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_phone ON patients(phone_number);
CREATE INDEX IF NOT EXISTS idx_patients_status ON patients(status);
CREATE INDEX IF NOT EXISTS idx_patients_queue ON patients(queue_date, queue_number);

-- ============================================================================
-- Lab Tests
-- ============================================================================

CREATE TABLE IF NOT EXISTS lab_tests (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    test_id TEXT UNIQUE,                         -- TEST + 4-digit seq
    patient_id TEXT NOT NULL,
    test_type TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    ordered_at TEXT NOT NULL,
    completed_at TEXT,
    results TEXT,
    status TEXT NOT NULL DEFAULT 'ORDERED' CHECK (status IN ('ORDERED', 'IN_PROGRESS', 'COMPLETED')),
    ordered_by TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_lab_tests_patient ON lab_tests(patient_id);
CREATE INDEX IF NOT EXISTS idx_lab_tests_status ON lab_tests(status);

-- ============================================================================
-- Prescriptions
-- ============================================================================

CREATE TABLE IF NOT EXISTS prescriptions (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    prescription_id TEXT UNIQUE,                 -- PRES + 4-digit seq
    patient_id TEXT NOT NULL,
    doctor_id TEXT NOT NULL,
    prescribed_at TEXT NOT NULL,
    diagnosis TEXT NOT NULL,
    medications TEXT NOT NULL DEFAULT '[]',      -- JSON array of Medication
    instructions TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'PRESCRIBED' CHECK (status IN ('PRESCRIBED', 'DISPENSED'))
);

CREATE INDEX IF NOT EXISTS idx_prescriptions_patient ON prescriptions(patient_id);
CREATE INDEX IF NOT EXISTS idx_prescriptions_status ON prescriptions(status);
"#;
