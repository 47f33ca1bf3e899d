use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use millqc_core::{AppError, AppResult, UserIdentity};
use millqc_domain::{
    DefectCatalog, InspectionSession, InspectionStage, OrderType, PermissionCatalog,
    QcAssignmentTable, RoleId, UnprovisionedStagePolicy, UserStagePermission,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{InspectionService, StartInspectionInput};
use crate::{
    AccessService, InspectionSessionRepository, QcAssignmentService, RoleAssignmentRepository,
    StagePermissionRepository,
};

struct FixedAssignments(HashMap<String, RoleId>);

#[async_trait]
impl RoleAssignmentRepository for FixedAssignments {
    async fn find_role_for_email(&self, email: &str) -> AppResult<Option<RoleId>> {
        Ok(self.0.get(email).copied())
    }
}

struct FixedStageGrants(Vec<UserStagePermission>);

#[async_trait]
impl StagePermissionRepository for FixedStageGrants {
    async fn list_stage_permissions(&self) -> AppResult<Vec<UserStagePermission>> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct FakeSessionRepository {
    sessions: RwLock<HashMap<Uuid, InspectionSession>>,
}

#[async_trait]
impl InspectionSessionRepository for FakeSessionRepository {
    async fn save_session(&self, session: InspectionSession) -> AppResult<()> {
        self.sessions.write().await.insert(session.id(), session);
        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AppResult<Option<InspectionSession>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }
}

const INSPECTOR: &str = "quality.line1@easternmills.com";
const SECOND_INSPECTOR: &str = "quality.line2@easternmills.com";

fn build_service(policy: UnprovisionedStagePolicy) -> InspectionService {
    let access_service = AccessService::new(
        Arc::new(PermissionCatalog::standard().unwrap_or_else(|_| unreachable!())),
        Arc::new(FixedAssignments(HashMap::from([
            (INSPECTOR.to_owned(), RoleId::QualityInspector),
            (SECOND_INSPECTOR.to_owned(), RoleId::QualityInspector),
        ]))),
    );
    let qc_assignment_service = QcAssignmentService::new(
        Arc::new(QcAssignmentTable::standard().unwrap_or_else(|_| unreachable!())),
        Arc::new(FixedStageGrants(vec![UserStagePermission {
            user_id: "u-1".to_owned(),
            email: INSPECTOR.to_owned(),
            name: "Line One".to_owned(),
            assigned_stages: vec!["Clipping".to_owned()],
            is_active: true,
        }])),
        policy,
    );

    InspectionService::new(
        Arc::new(DefectCatalog::standard().unwrap_or_else(|_| unreachable!())),
        Arc::new(FakeSessionRepository::default()),
        access_service,
        qc_assignment_service,
    )
}

fn actor(email: &str) -> UserIdentity {
    UserIdentity::new(email, email, Some(email.to_owned()))
}

fn clipping() -> StartInspectionInput {
    StartInspectionInput {
        stage: InspectionStage::Clipping,
        order_type: OrderType::Production,
    }
}

#[tokio::test]
async fn inspector_records_defects_on_assigned_stage() {
    let service = build_service(UnprovisionedStagePolicy::ShowAll);
    let inspector = actor(INSPECTOR);

    let session = service
        .start_session(&inspector, clipping())
        .await
        .unwrap_or_else(|_| unreachable!());

    let updated = service
        .toggle_defect(&inspector, session.id(), "C1")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.selection().observations().len(), 1);

    let updated = service
        .set_defect_count(&inspector, session.id(), "C1", 0)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(
        updated.selection().get("C1").map(|value| value.count()),
        Some(1)
    );

    let reloaded = service
        .get_session(&inspector, session.id())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(reloaded, updated);
}

#[tokio::test]
async fn unassigned_stage_is_forbidden() {
    let service = build_service(UnprovisionedStagePolicy::ShowAll);
    let result = service
        .start_session(
            &actor(INSPECTOR),
            StartInspectionInput {
                stage: InspectionStage::Bazaar,
                order_type: OrderType::Production,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn unprovisioned_inspector_follows_policy() {
    let other = actor(SECOND_INSPECTOR);

    let open = build_service(UnprovisionedStagePolicy::ShowAll);
    assert!(open.start_session(&other, clipping()).await.is_ok());

    let closed = build_service(UnprovisionedStagePolicy::Deny);
    let result = closed.start_session(&other, clipping()).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn viewer_cannot_open_inspections() {
    let service = build_service(UnprovisionedStagePolicy::ShowAll);
    let result = service
        .start_session(&actor("accounts@easternmills.com"), clipping())
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn heuristic_inspector_cannot_open_or_edit_inspections() {
    let service = build_service(UnprovisionedStagePolicy::ShowAll);
    let assigned = actor(INSPECTOR);
    let guessed = actor("quality.line9@easternmills.com");

    let result = service.start_session(&guessed, clipping()).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let session = service
        .start_session(&assigned, clipping())
        .await
        .unwrap_or_else(|_| unreachable!());
    let result = service.toggle_defect(&guessed, session.id(), "C1").await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    assert!(service.get_session(&guessed, session.id()).await.is_ok());
}

#[tokio::test]
async fn session_defects_follow_stage_process() {
    let service = build_service(UnprovisionedStagePolicy::ShowAll);
    let inspector = actor(INSPECTOR);
    let session = service
        .start_session(&inspector, clipping())
        .await
        .unwrap_or_else(|_| unreachable!());

    let codes: Vec<String> = service
        .defects_for_session(&inspector, session.id())
        .await
        .unwrap_or_default()
        .iter()
        .map(|definition| definition.code().to_owned())
        .collect();
    assert_eq!(codes, vec!["C1", "C2", "C3", "C4", "C5", "C6"]);
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let service = build_service(UnprovisionedStagePolicy::ShowAll);
    let result = service
        .toggle_defect(&actor(INSPECTOR), Uuid::new_v4(), "C1")
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
