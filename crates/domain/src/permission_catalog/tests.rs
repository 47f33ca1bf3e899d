use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use super::{
    Department, PermissionCatalog, Role, can_access_department, default_role_for_email,
};
use crate::{DepartmentId, FeatureId, Permission, RoleId};

fn standard_catalog() -> PermissionCatalog {
    PermissionCatalog::standard().unwrap_or_else(|_| unreachable!())
}

fn role(catalog: &PermissionCatalog, id: RoleId) -> Role {
    catalog.role(id).cloned().unwrap_or_else(|| unreachable!())
}

#[test]
fn email_heuristic_matches_documented_examples() {
    assert_eq!(default_role_for_email("not-an-email"), RoleId::Viewer);
    assert_eq!(default_role_for_email("admin@easternmills.com"), RoleId::Admin);
    assert_eq!(
        default_role_for_email("quality.manager@easternmills.com"),
        RoleId::QualityManager
    );
    assert_eq!(default_role_for_email("random@other.com"), RoleId::Viewer);
}

#[test]
fn email_heuristic_covers_remaining_branches() {
    assert_eq!(default_role_for_email("erp@easternmills.com"), RoleId::Admin);
    assert_eq!(
        default_role_for_email("sysadmin.delhi@easternmills.com"),
        RoleId::Admin
    );
    assert_eq!(
        default_role_for_email("quality.floor2@easternmills.com"),
        RoleId::QualityInspector
    );
    assert_eq!(
        default_role_for_email("sampling.manager@easternmills.com"),
        RoleId::SamplingManager
    );
    assert_eq!(
        default_role_for_email("sampling.desk@easternmills.com"),
        RoleId::SamplingTeam
    );
    assert_eq!(
        default_role_for_email("accounts@easternmills.com"),
        RoleId::Viewer
    );
}

#[test]
fn email_heuristic_rejects_foreign_and_malformed_addresses() {
    assert_eq!(default_role_for_email(""), RoleId::Viewer);
    assert_eq!(default_role_for_email("@easternmills.com"), RoleId::Viewer);
    assert_eq!(
        default_role_for_email("admin@easternmills.com.evil.test"),
        RoleId::Viewer
    );
    assert_eq!(default_role_for_email("admin@gmail.com"), RoleId::Viewer);
}

#[test]
fn email_heuristic_ignores_case_and_padding() {
    assert_eq!(
        default_role_for_email("  Quality.Manager@EasternMills.com "),
        RoleId::QualityManager
    );
}

#[test]
fn standard_catalog_defines_every_role() {
    let catalog = standard_catalog();
    for id in RoleId::all() {
        assert!(catalog.role(*id).is_some(), "missing role {}", id.as_str());
    }
}

#[test]
fn standard_catalog_maps_every_department_feature() {
    assert!(standard_catalog().unmapped_features().is_empty());
}

#[test]
fn department_access_follows_role_table() {
    let catalog = standard_catalog();
    let inspector = role(&catalog, RoleId::QualityInspector);

    assert!(can_access_department(&inspector, DepartmentId::Quality));
    assert!(!can_access_department(&inspector, DepartmentId::Sampling));
    assert!(!can_access_department(&inspector, DepartmentId::Admin));
}

#[test]
fn viewer_reaches_no_department() {
    let catalog = standard_catalog();
    let viewer = role(&catalog, RoleId::Viewer);
    assert!(catalog.accessible_departments(&viewer).is_empty());
    assert!(catalog.accessible_features(&viewer).is_empty());
}

#[test]
fn quality_manager_features_are_filtered_by_permission() {
    let catalog = standard_catalog();
    let manager = role(&catalog, RoleId::QualityManager);
    let features = catalog.accessible_features(&manager);

    assert!(features.contains(&FeatureId::InspectionApproval));
    assert!(features.contains(&FeatureId::ComplianceAudits));
    assert!(!features.contains(&FeatureId::ProductionDashboard));
    assert!(!features.contains(&FeatureId::UserManagement));
}

#[test]
fn admin_role_sees_every_feature() {
    let catalog = standard_catalog();
    let admin = role(&catalog, RoleId::Admin);
    let features: BTreeSet<FeatureId> = catalog.accessible_features(&admin).into_iter().collect();
    let all: BTreeSet<FeatureId> = FeatureId::all().iter().copied().collect();
    assert_eq!(features, all);
}

#[test]
fn unmapped_feature_fails_closed() {
    let department = Department::new(
        DepartmentId::Quality,
        "quality",
        "Quality Control",
        vec![FeatureId::QualityDashboard, FeatureId::InspectionApproval],
        [Permission::ViewQuality],
    )
    .unwrap_or_else(|_| unreachable!());
    let catalog = PermissionCatalog::new(
        Vec::new(),
        vec![department],
        HashMap::from([(FeatureId::QualityDashboard, Permission::ViewQuality)]),
    )
    .unwrap_or_else(|_| unreachable!());

    let everything: BTreeSet<Permission> = Permission::all().iter().copied().collect();
    assert!(catalog.can_access_feature(&everything, FeatureId::QualityDashboard));
    assert!(!catalog.can_access_feature(&everything, FeatureId::InspectionApproval));
    assert_eq!(
        catalog.unmapped_features(),
        vec![FeatureId::InspectionApproval]
    );
}

#[test]
fn mapped_feature_delegates_to_permission_check() {
    let catalog = standard_catalog();
    let granted = BTreeSet::from([Permission::ViewQuality]);
    assert!(catalog.can_access_feature(&granted, FeatureId::QualityDashboard));
    assert!(!catalog.can_access_feature(&granted, FeatureId::InspectionForm));

    let global = BTreeSet::from([Permission::ViewAllData]);
    assert!(catalog.can_access_feature(&global, FeatureId::ReportExport));
}

#[test]
fn duplicate_role_is_rejected() {
    let viewer = Role::new(RoleId::Viewer, "Viewer", "", [], [], false)
        .unwrap_or_else(|_| unreachable!());
    let result = PermissionCatalog::new(vec![viewer.clone(), viewer], Vec::new(), HashMap::new());
    assert!(result.is_err());
}

#[test]
fn blank_role_name_is_rejected() {
    assert!(Role::new(RoleId::Viewer, "  ", "", [], [], false).is_err());
}

fn any_department() -> impl Strategy<Value = DepartmentId> {
    proptest::sample::select(DepartmentId::all().to_vec())
}

proptest! {
    #[test]
    fn admin_roles_reach_every_department(
        listed in proptest::collection::btree_set(any_department(), 0..4),
        target in any_department(),
    ) {
        let admin = Role::new(RoleId::Admin, "Admin", "", [], listed, true)
            .unwrap_or_else(|_| unreachable!());
        prop_assert!(can_access_department(&admin, target));
    }

    #[test]
    fn non_admin_roles_reach_only_listed_departments(
        listed in proptest::collection::btree_set(any_department(), 0..4),
        target in any_department(),
    ) {
        let role = Role::new(RoleId::Viewer, "Viewer", "", [], listed.clone(), false)
            .unwrap_or_else(|_| unreachable!());
        prop_assert_eq!(can_access_department(&role, target), listed.contains(&target));
    }
}
