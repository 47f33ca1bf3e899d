use std::collections::{BTreeMap, HashSet};

use millqc_core::AppError;
use serde::{Deserialize, Serialize};

use crate::defect::{DefectDefinition, Severity};

/// Defect recorded during an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredObservation")]
pub struct SelectedDefectObservation {
    defect_code: String,
    severity: Severity,
    count: u32,
}

#[derive(Deserialize)]
struct StoredObservation {
    defect_code: String,
    severity: Severity,
    count: u32,
}

impl TryFrom<StoredObservation> for SelectedDefectObservation {
    type Error = AppError;

    fn try_from(value: StoredObservation) -> Result<Self, Self::Error> {
        if value.defect_code.trim().is_empty() {
            return Err(AppError::Validation(
                "stored defect code must not be empty".to_owned(),
            ));
        }
        if value.count == 0 {
            return Err(AppError::Validation(format!(
                "stored count for defect '{}' must be at least one",
                value.defect_code
            )));
        }

        Ok(Self {
            defect_code: value.defect_code,
            severity: value.severity,
            count: value.count,
        })
    }
}

impl SelectedDefectObservation {
    /// Returns the referenced defect code.
    #[must_use]
    pub fn defect_code(&self) -> &str {
        self.defect_code.as_str()
    }

    /// Returns the severity captured when the defect was selected.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the number of occurrences, always at least one.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Outcome of toggling a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefectToggle {
    /// The defect was added with a count of one.
    Added,
    /// The defect was removed.
    Removed,
}

/// Defects selected in one inspection, one observation per code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSelection")]
pub struct DefectSelection {
    observations: Vec<SelectedDefectObservation>,
}

#[derive(Deserialize)]
struct StoredSelection {
    observations: Vec<SelectedDefectObservation>,
}

impl TryFrom<StoredSelection> for DefectSelection {
    type Error = AppError;

    fn try_from(value: StoredSelection) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for observation in &value.observations {
            if !seen.insert(observation.defect_code.as_str()) {
                return Err(AppError::Validation(format!(
                    "defect '{}' is selected more than once",
                    observation.defect_code
                )));
            }
        }

        Ok(Self {
            observations: value.observations,
        })
    }
}

impl DefectSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns observations in selection order.
    #[must_use]
    pub fn observations(&self) -> &[SelectedDefectObservation] {
        self.observations.as_slice()
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Returns the observation for `code`, if selected.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&SelectedDefectObservation> {
        self.observations
            .iter()
            .find(|observation| observation.defect_code == code)
    }

    /// Adds `definition` if absent, removes it otherwise.
    pub fn toggle(&mut self, definition: &DefectDefinition) -> DefectToggle {
        if self.remove(definition.code()) {
            return DefectToggle::Removed;
        }

        self.observations.push(SelectedDefectObservation {
            defect_code: definition.code().to_owned(),
            severity: definition.severity(),
            count: 1,
        });
        DefectToggle::Added
    }

    /// Removes the observation for `code`. Returns whether anything was removed.
    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.observations.len();
        self.observations
            .retain(|observation| observation.defect_code != code);
        self.observations.len() != before
    }

    /// Sets the count for a selected defect, clamped to at least one.
    ///
    /// Returns the stored count, or `None` when `code` is not selected.
    pub fn set_count(&mut self, code: &str, requested: i64) -> Option<u32> {
        let observation = self
            .observations
            .iter_mut()
            .find(|observation| observation.defect_code == code)?;

        observation.count = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);
        Some(observation.count)
    }

    /// Returns the most severe tier recorded, if any.
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        // Severity orders Critical first.
        self.observations
            .iter()
            .map(SelectedDefectObservation::severity)
            .min()
    }

    /// Returns total occurrences per tier.
    #[must_use]
    pub fn severity_totals(&self) -> BTreeMap<Severity, u64> {
        let mut totals = BTreeMap::new();
        for observation in &self.observations {
            *totals.entry(observation.severity).or_insert(0) += u64::from(observation.count);
        }
        totals
    }
}
