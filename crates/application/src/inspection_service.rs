use std::sync::Arc;

use millqc_core::{AppError, AppResult, UserIdentity};
use millqc_domain::{
    DefectCatalog, DefectDefinition, InspectionSession, InspectionStage, OrderType, Permission,
};
use tracing::info;
use uuid::Uuid;

use crate::{AccessService, InspectionSessionRepository, QcAssignmentService};

/// Input payload for opening an inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartInspectionInput {
    /// Stage being inspected.
    pub stage: InspectionStage,
    /// Order type under inspection.
    pub order_type: OrderType,
}

/// Application service for defect recording during inspections.
#[derive(Clone)]
pub struct InspectionService {
    defects: Arc<DefectCatalog>,
    sessions: Arc<dyn InspectionSessionRepository>,
    access_service: AccessService,
    qc_assignment_service: QcAssignmentService,
}

impl InspectionService {
    /// Creates a new inspection service.
    #[must_use]
    pub fn new(
        defects: Arc<DefectCatalog>,
        sessions: Arc<dyn InspectionSessionRepository>,
        access_service: AccessService,
        qc_assignment_service: QcAssignmentService,
    ) -> Self {
        Self {
            defects,
            sessions,
            access_service,
            qc_assignment_service,
        }
    }

    /// Opens a session on a stage the caller may act on.
    pub async fn start_session(
        &self,
        actor: &UserIdentity,
        input: StartInspectionInput,
    ) -> AppResult<InspectionSession> {
        self.access_service
            .require_permission(actor, Permission::CreateInspection)
            .await?;

        let visibility = self
            .qc_assignment_service
            .filter_stages_for_user(actor.email().unwrap_or_default())
            .await?;
        if !visibility.includes(input.stage) {
            return Err(AppError::Forbidden(format!(
                "subject '{}' is not assigned to stage '{}'",
                actor.subject(),
                input.stage
            )));
        }

        let session = InspectionSession::new(input.stage, actor.subject(), input.order_type)?;
        self.sessions.save_session(session.clone()).await?;

        info!(
            session_id = %session.id(),
            stage = input.stage.as_str(),
            subject = actor.subject(),
            "inspection session opened"
        );

        Ok(session)
    }

    /// Returns a session by id.
    pub async fn get_session(
        &self,
        actor: &UserIdentity,
        session_id: Uuid,
    ) -> AppResult<InspectionSession> {
        self.access_service
            .require_permission(actor, Permission::ViewQuality)
            .await?;

        self.load_session(session_id).await
    }

    /// Returns the defects that can be recorded in a session.
    pub async fn defects_for_session(
        &self,
        actor: &UserIdentity,
        session_id: Uuid,
    ) -> AppResult<Vec<DefectDefinition>> {
        let session = self.get_session(actor, session_id).await?;
        Ok(self
            .defects
            .defects_for_process(session.process())
            .into_iter()
            .cloned()
            .collect())
    }

    /// Toggles a defect on or off in a session.
    pub async fn toggle_defect(
        &self,
        actor: &UserIdentity,
        session_id: Uuid,
        defect_code: &str,
    ) -> AppResult<InspectionSession> {
        self.access_service
            .require_permission(actor, Permission::EditInspection)
            .await?;

        let mut session = self.load_session(session_id).await?;
        let outcome = session.toggle_defect(&self.defects, defect_code)?;
        self.sessions.save_session(session.clone()).await?;

        info!(
            session_id = %session_id,
            defect_code,
            outcome = ?outcome,
            "inspection defect toggled"
        );

        Ok(session)
    }

    /// Sets the count of a selected defect, clamped to at least one.
    pub async fn set_defect_count(
        &self,
        actor: &UserIdentity,
        session_id: Uuid,
        defect_code: &str,
        requested_count: i64,
    ) -> AppResult<InspectionSession> {
        self.access_service
            .require_permission(actor, Permission::EditInspection)
            .await?;

        let mut session = self.load_session(session_id).await?;
        let stored = session.set_defect_count(defect_code, requested_count)?;
        self.sessions.save_session(session.clone()).await?;

        info!(
            session_id = %session_id,
            defect_code,
            requested_count,
            stored,
            "inspection defect count updated"
        );

        Ok(session)
    }

    async fn load_session(&self, session_id: Uuid) -> AppResult<InspectionSession> {
        self.sessions
            .find_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("inspection '{session_id}' does not exist")))
    }
}

#[cfg(test)]
mod tests;
