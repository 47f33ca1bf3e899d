use async_trait::async_trait;
use millqc_core::AppResult;
use millqc_domain::{InspectionSession, RoleId, UserStagePermission};
use uuid::Uuid;

/// Repository port for explicit role assignments.
#[async_trait]
pub trait RoleAssignmentRepository: Send + Sync {
    /// Finds the role explicitly assigned to a normalized email.
    async fn find_role_for_email(&self, email: &str) -> AppResult<Option<RoleId>>;
}

/// Repository port for the administrator-managed stage grants.
#[async_trait]
pub trait StagePermissionRepository: Send + Sync {
    /// Lists every stage grant record.
    async fn list_stage_permissions(&self) -> AppResult<Vec<UserStagePermission>>;
}

/// Repository port for inspection sessions.
#[async_trait]
pub trait InspectionSessionRepository: Send + Sync {
    /// Inserts or replaces a session.
    async fn save_session(&self, session: InspectionSession) -> AppResult<()>;

    /// Finds a session by id.
    async fn find_session(&self, session_id: Uuid) -> AppResult<Option<InspectionSession>>;
}
