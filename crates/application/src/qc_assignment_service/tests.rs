use std::sync::Arc;

use async_trait::async_trait;
use millqc_core::AppResult;
use millqc_domain::{
    InspectionStage, QcAssignmentTable, UnprovisionedStagePolicy, UserStagePermission,
};

use super::{QcAssignmentService, StageVisibilitySource};
use crate::StagePermissionRepository;

struct FakeStagePermissionRepository {
    records: Vec<UserStagePermission>,
}

#[async_trait]
impl StagePermissionRepository for FakeStagePermissionRepository {
    async fn list_stage_permissions(&self) -> AppResult<Vec<UserStagePermission>> {
        Ok(self.records.clone())
    }
}

fn grant(email: &str, stages: &[&str], is_active: bool) -> UserStagePermission {
    UserStagePermission {
        user_id: "u-1".to_owned(),
        email: email.to_owned(),
        name: "Inspector".to_owned(),
        assigned_stages: stages.iter().map(|stage| (*stage).to_owned()).collect(),
        is_active,
    }
}

fn service(
    records: Vec<UserStagePermission>,
    policy: UnprovisionedStagePolicy,
) -> QcAssignmentService {
    QcAssignmentService::new(
        Arc::new(QcAssignmentTable::standard().unwrap_or_else(|_| unreachable!())),
        Arc::new(FakeStagePermissionRepository { records }),
        policy,
    )
}

#[tokio::test]
async fn assigned_stages_are_returned_as_granted() {
    let service = service(
        vec![grant("qc@easternmills.com", &["Binding", "Clipping"], true)],
        UnprovisionedStagePolicy::ShowAll,
    );

    let visibility = service
        .filter_stages_for_user("qc@easternmills.com")
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(visibility.source, StageVisibilitySource::Assigned);
    assert_eq!(
        visibility.stages,
        vec!["Binding".to_owned(), "Clipping".to_owned()]
    );
    assert!(visibility.includes(InspectionStage::Clipping));
    assert!(!visibility.includes(InspectionStage::Bazaar));
}

#[tokio::test]
async fn show_all_policy_unlocks_every_stage() {
    let service = service(Vec::new(), UnprovisionedStagePolicy::ShowAll);
    let visibility = service
        .filter_stages_for_user("new.hire@easternmills.com")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(visibility.stages.len(), 8);
    assert_eq!(
        visibility.source,
        StageVisibilitySource::Unprovisioned(UnprovisionedStagePolicy::ShowAll)
    );
}

#[tokio::test]
async fn deny_policy_returns_nothing_for_inactive_grant() {
    let service = service(
        vec![grant("qc@easternmills.com", &["Binding"], false)],
        UnprovisionedStagePolicy::Deny,
    );
    let visibility = service
        .filter_stages_for_user("qc@easternmills.com")
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(visibility.stages.is_empty());
    assert!(
        service
            .visible_stages_for_user("qc@easternmills.com")
            .await
            .unwrap_or_default()
            .is_empty()
    );
}

#[tokio::test]
async fn roster_lookups_delegate_to_table() {
    let service = service(Vec::new(), UnprovisionedStagePolicy::ShowAll);

    assert_eq!(service.inspectors_for_stage(InspectionStage::FinalInspection).len(), 1);
    assert_eq!(
        service.stages_for_inspector("QC-01"),
        vec![InspectionStage::OnLoom, InspectionStage::Bazaar]
    );
    assert!(service.stages_for_inspector("nobody").is_empty());
}
