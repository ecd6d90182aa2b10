use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Flag;
use crate::reference_range;

/// One row of the results table, exactly as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestResult {
    pub id: String,
    pub test_name: String,
    pub result: String,
    pub reference_range: String,
    pub unit: String,
}

impl TestResult {
    pub fn new(test_name: &str, result: &str, reference_range: &str, unit: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            test_name: test_name.into(),
            result: result.into(),
            reference_range: reference_range.into(),
            unit: unit.into(),
        }
    }

    /// Empty row with a fresh id.
    pub fn blank() -> Self {
        Self::new("", "", "", "")
    }

    /// Recomputed on every call; never cached on the row.
    pub fn flag(&self) -> Flag {
        reference_range::classify(&self.result, &self.reference_range)
    }
}

impl Default for TestResult {
    fn default() -> Self {
        Self::blank()
    }
}
