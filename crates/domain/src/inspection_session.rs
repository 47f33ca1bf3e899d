use chrono::{DateTime, Utc};
use millqc_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defect::DefectCatalog;
use crate::defect_selection::{DefectSelection, DefectToggle};
use crate::stage::{InspectionStage, OrderType, ProcessName};

/// One inspector's pass over a rug at a given stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredSession")]
pub struct InspectionSession {
    id: Uuid,
    stage: InspectionStage,
    process: ProcessName,
    inspector_subject: NonEmptyString,
    order_type: OrderType,
    selection: DefectSelection,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StoredSession {
    id: Uuid,
    stage: InspectionStage,
    process: ProcessName,
    inspector_subject: NonEmptyString,
    order_type: OrderType,
    selection: DefectSelection,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoredSession> for InspectionSession {
    type Error = AppError;

    fn try_from(value: StoredSession) -> Result<Self, Self::Error> {
        if value.process != value.stage.process() {
            return Err(AppError::Validation(format!(
                "inspection '{}' records process '{}' but stage '{}' maps to '{}'",
                value.id,
                value.process,
                value.stage,
                value.stage.process()
            )));
        }

        Ok(Self {
            id: value.id,
            stage: value.stage,
            process: value.process,
            inspector_subject: value.inspector_subject,
            order_type: value.order_type,
            selection: value.selection,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

impl InspectionSession {
    /// Opens a session with an empty defect selection.
    pub fn new(
        stage: InspectionStage,
        inspector_subject: impl Into<String>,
        order_type: OrderType,
    ) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            stage,
            process: stage.process(),
            inspector_subject: NonEmptyString::new(inspector_subject)?,
            order_type,
            selection: DefectSelection::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the session id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the inspected stage.
    #[must_use]
    pub fn stage(&self) -> InspectionStage {
        self.stage
    }

    /// Returns the process whose defects apply.
    #[must_use]
    pub fn process(&self) -> ProcessName {
        self.process
    }

    /// Returns the subject of the inspector who opened the session.
    #[must_use]
    pub fn inspector_subject(&self) -> &str {
        self.inspector_subject.as_str()
    }

    /// Returns the order type under inspection.
    #[must_use]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    /// Returns the current defect selection.
    #[must_use]
    pub fn selection(&self) -> &DefectSelection {
        &self.selection
    }

    /// Returns when the session was opened.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the selection last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Toggles a defect that belongs to this session's process.
    pub fn toggle_defect(
        &mut self,
        catalog: &DefectCatalog,
        code: &str,
    ) -> AppResult<DefectToggle> {
        let definition = catalog
            .find(code)
            .filter(|definition| definition.process() == self.process)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "defect '{code}' is not part of process '{}'",
                    self.process
                ))
            })?;

        let outcome = self.selection.toggle(definition);
        self.updated_at = Utc::now();
        Ok(outcome)
    }

    /// Sets the count of a selected defect, clamped to at least one.
    pub fn set_defect_count(&mut self, code: &str, requested: i64) -> AppResult<u32> {
        let stored = self.selection.set_count(code, requested).ok_or_else(|| {
            AppError::NotFound(format!(
                "defect '{code}' is not selected in inspection '{}'",
                self.id
            ))
        })?;

        self.updated_at = Utc::now();
        Ok(stored)
    }
}
