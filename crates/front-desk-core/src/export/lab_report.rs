//! Laboratory result printout.

use serde::{Deserialize, Serialize};

use crate::models::{LabTest, Patient};

/// Order date format used on printouts.
pub const PRINT_DATE_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Lab result printout for a single test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabReport {
    pub patient_name: String,
    pub test_type: String,
    pub test_id: String,
    /// Formatted with [`PRINT_DATE_FORMAT`]
    pub order_date: String,
    pub results: String,
}

impl LabReport {
    /// Build a printout. Returns `None` when the test has no results yet.
    ///
    /// The patient may be gone (the reference is not enforced), in which case
    /// the name reads "Unknown Patient".
    pub fn new(test: &LabTest, patient: Option<&Patient>) -> Option<Self> {
        let results = test
            .results
            .as_deref()
            .filter(|r| !r.trim().is_empty())?;

        Some(Self {
            patient_name: patient
                .map(Patient::full_name)
                .unwrap_or_else(|| "Unknown Patient".to_string()),
            test_type: test.test_type.clone(),
            test_id: test.test_id.clone(),
            order_date: test.ordered_at.format(PRINT_DATE_FORMAT).to_string(),
            results: results.to_string(),
        })
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text printout.
    pub fn to_text(&self) -> String {
        format!(
            "Lab Test Results - {}\n\nPatient: {}\nTest Type: {}\nTest ID: {}\nOrder Date: {}\nResults:\n{}\n",
            self.test_id,
            self.patient_name,
            self.test_type,
            self.test_id,
            self.order_date,
            self.results,
        )
    }
}
