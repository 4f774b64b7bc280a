//! Patient, lab test and prescription lifecycles.
//!
//! ```text
//!                 QueueEntered            CalledByDoctor
//!   REGISTERED ───────────────▶ WAITING ─────────────────▶ WITH_DOCTOR
//!        │                        ▲  ▲                       │  │  │
//!        └──── CalledByDoctor ────┼──┼───────────────────────┘  │  │
//!                                 │  │  LabCompleted            │  │
//!                                 │  └──────────── IN_LAB ◀─────┘  │ LabOrdered
//!                                 │                                │
//!                    QueueEntered │     PrescriptionCreated        │
//!                  (returning)    │  PRESCRIPTION_READY ◀──────────┤
//!                                 │        │ PrescriptionDispensed │
//!                                 │        ▼                       │ ConsultationClosed
//!                                 └──── COMPLETED ◀────────────────┘
//! ```
//!
//! Every transition is triggered by an explicit call; nothing moves on a timer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("Patient in state {from} cannot accept {event:?}")]
    InvalidTransition {
        from: PatientStatus,
        event: PatientEvent,
    },

    #[error("Lab test cannot move from {from} to {to}")]
    LabTestRegression { from: LabTestStatus, to: LabTestStatus },

    #[error("Prescription cannot move from {from} to {to}")]
    PrescriptionRegression {
        from: PrescriptionStatus,
        to: PrescriptionStatus,
    },

    #[error("Unknown status: {0}")]
    UnknownStatus(String),
}

// =========================================================================
// Patient
// =========================================================================

/// Current stage of a patient visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatientStatus {
    /// Record created, not yet queued
    Registered,
    /// In the consultation queue
    Waiting,
    /// Called by a doctor
    WithDoctor,
    /// Sent to the laboratory
    InLab,
    /// Prescription written, awaiting pharmacy
    PrescriptionReady,
    /// Visit finished
    Completed,
}

/// Explicit external events that move a patient between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientEvent {
    /// Registration finalized, or a returning patient checked in again
    QueueEntered,
    /// Doctor called the patient from the queue
    CalledByDoctor,
    /// Doctor ordered a lab test
    LabOrdered,
    /// Laboratory recorded results
    LabCompleted,
    /// Doctor wrote a prescription
    PrescriptionCreated,
    /// Pharmacy dispensed the prescription
    PrescriptionDispensed,
    /// Doctor closed the consultation without lab or prescription
    ConsultationClosed,
}

impl PatientEvent {
    /// State the event leads to from its primary source state.
    pub fn target(self) -> PatientStatus {
        match self {
            PatientEvent::QueueEntered => PatientStatus::Waiting,
            PatientEvent::CalledByDoctor => PatientStatus::WithDoctor,
            PatientEvent::LabOrdered => PatientStatus::InLab,
            PatientEvent::LabCompleted => PatientStatus::Waiting,
            PatientEvent::PrescriptionCreated => PatientStatus::PrescriptionReady,
            PatientEvent::PrescriptionDispensed => PatientStatus::Completed,
            PatientEvent::ConsultationClosed => PatientStatus::Completed,
        }
    }
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 6] = [
        PatientStatus::Registered,
        PatientStatus::Waiting,
        PatientStatus::WithDoctor,
        PatientStatus::InLab,
        PatientStatus::PrescriptionReady,
        PatientStatus::Completed,
    ];

    /// Apply an event, returning the next state.
    pub fn apply(self, event: PatientEvent) -> Result<PatientStatus, LifecycleError> {
        use PatientEvent as E;
        use PatientStatus as S;

        let next = match (self, event) {
            (S::Registered | S::Completed, E::QueueEntered) => S::Waiting,
            (S::Registered | S::Waiting, E::CalledByDoctor) => S::WithDoctor,
            (S::WithDoctor | S::InLab, E::LabOrdered) => S::InLab,
            (S::InLab, E::LabCompleted) => S::Waiting,
            // results for an earlier order arriving after the patient moved on
            (_, E::LabCompleted) => self,
            (S::WithDoctor, E::PrescriptionCreated) => S::PrescriptionReady,
            (S::PrescriptionReady, E::PrescriptionDispensed) => S::Completed,
            (S::WithDoctor, E::ConsultationClosed) => S::Completed,
            (from, event) => return Err(LifecycleError::InvalidTransition { from, event }),
        };
        Ok(next)
    }

    /// Whether the patient shows up in the consultation queue.
    pub fn is_waiting(self) -> bool {
        matches!(self, PatientStatus::Waiting | PatientStatus::Registered)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Registered => "REGISTERED",
            PatientStatus::Waiting => "WAITING",
            PatientStatus::WithDoctor => "WITH_DOCTOR",
            PatientStatus::InLab => "IN_LAB",
            PatientStatus::PrescriptionReady => "PRESCRIPTION_READY",
            PatientStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| LifecycleError::UnknownStatus(s.to_string()))
    }
}

// =========================================================================
// Lab test
// =========================================================================

/// Lab test status. Linear, never moves backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabTestStatus {
    Ordered,
    InProgress,
    Completed,
}

impl LabTestStatus {
    /// Move forward to `to`. Skipping `InProgress` is allowed.
    pub fn advance_to(self, to: LabTestStatus) -> Result<LabTestStatus, LifecycleError> {
        if to > self {
            Ok(to)
        } else {
            Err(LifecycleError::LabTestRegression { from: self, to })
        }
    }

    /// Ordered or in progress.
    pub fn is_pending(self) -> bool {
        self != LabTestStatus::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LabTestStatus::Ordered => "ORDERED",
            LabTestStatus::InProgress => "IN_PROGRESS",
            LabTestStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for LabTestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabTestStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORDERED" => Ok(LabTestStatus::Ordered),
            "IN_PROGRESS" => Ok(LabTestStatus::InProgress),
            "COMPLETED" => Ok(LabTestStatus::Completed),
            _ => Err(LifecycleError::UnknownStatus(s.to_string())),
        }
    }
}

// =========================================================================
// Prescription
// =========================================================================

/// Prescription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    Prescribed,
    Dispensed,
}

impl PrescriptionStatus {
    pub fn advance_to(
        self,
        to: PrescriptionStatus,
    ) -> Result<PrescriptionStatus, LifecycleError> {
        if to > self {
            Ok(to)
        } else {
            Err(LifecycleError::PrescriptionRegression { from: self, to })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrescriptionStatus::Prescribed => "PRESCRIBED",
            PrescriptionStatus::Dispensed => "DISPENSED",
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrescriptionStatus {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRESCRIBED" => Ok(PrescriptionStatus::Prescribed),
            "DISPENSED" => Ok(PrescriptionStatus::Dispensed),
            _ => Err(LifecycleError::UnknownStatus(s.to_string())),
        }
    }
}
