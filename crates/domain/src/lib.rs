//! Quality-control decision tables and invariants.

#![forbid(unsafe_code)]

mod defect;
mod defect_selection;
mod inspection_session;
mod permission;
mod permission_catalog;
mod qc_assignment;
mod stage;

pub use defect::{
    DefectCatalog, DefectDefinition, Severity, SeverityDisplayClass, severity_display_class,
};
pub use defect_selection::{DefectSelection, DefectToggle, SelectedDefectObservation};
pub use inspection_session::InspectionSession;
pub use permission::{DepartmentId, FeatureId, Permission, RoleId, has_permission};
pub use permission_catalog::{
    ADMIN_USERNAME, Department, ORGANIZATION_EMAIL_DOMAIN, PermissionCatalog, Role,
    can_access_department, default_role_for_email,
};
pub use qc_assignment::{
    Inspector, InspectorId, QcAssignmentTable, UnprovisionedStagePolicy, UserStagePermission,
    filter_stages_by_permission, filter_stages_with_policy, visible_stages_for_user,
};
pub use stage::{
    ALL_INSPECTION_STAGES, InspectionStage, OrderType, ProcessName, map_inspection_stage_to_process,
};
