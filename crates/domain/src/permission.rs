use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use millqc_core::AppError;
use serde::{Deserialize, Serialize};

/// Permissions granted to ERP users through their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Global override that satisfies every other permission check.
    ViewAllData,
    /// Allows managing user accounts.
    ManageUsers,
    /// Allows managing roles and their grants.
    ManageRoles,
    /// Allows reading quality dashboards and inspection results.
    ViewQuality,
    /// Allows starting new inspections.
    CreateInspection,
    /// Allows recording defects on an open inspection.
    EditInspection,
    /// Allows approving or rejecting completed inspections.
    ApproveInspection,
    /// Allows reading sampling and design tracking.
    ViewSampling,
    /// Allows creating new samples.
    CreateSample,
    /// Allows editing existing samples.
    EditSample,
    /// Allows reading production status.
    ViewProduction,
    /// Allows managing production orders.
    ManageProduction,
    /// Allows reading buyer and merchandising records.
    ViewBuyers,
    /// Allows managing buyer and merchandising records.
    ManageBuyers,
    /// Allows reading compliance audits.
    ViewCompliance,
    /// Allows managing compliance audits.
    ManageCompliance,
    /// Allows reading reports.
    ViewReports,
    /// Allows exporting reports.
    ExportReports,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewAllData => "view_all_data",
            Self::ManageUsers => "manage_users",
            Self::ManageRoles => "manage_roles",
            Self::ViewQuality => "view_quality",
            Self::CreateInspection => "create_inspection",
            Self::EditInspection => "edit_inspection",
            Self::ApproveInspection => "approve_inspection",
            Self::ViewSampling => "view_sampling",
            Self::CreateSample => "create_sample",
            Self::EditSample => "edit_sample",
            Self::ViewProduction => "view_production",
            Self::ManageProduction => "manage_production",
            Self::ViewBuyers => "view_buyers",
            Self::ManageBuyers => "manage_buyers",
            Self::ViewCompliance => "view_compliance",
            Self::ManageCompliance => "manage_compliance",
            Self::ViewReports => "view_reports",
            Self::ExportReports => "export_reports",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ViewAllData,
            Permission::ManageUsers,
            Permission::ManageRoles,
            Permission::ViewQuality,
            Permission::CreateInspection,
            Permission::EditInspection,
            Permission::ApproveInspection,
            Permission::ViewSampling,
            Permission::CreateSample,
            Permission::EditSample,
            Permission::ViewProduction,
            Permission::ManageProduction,
            Permission::ViewBuyers,
            Permission::ManageBuyers,
            Permission::ViewCompliance,
            Permission::ManageCompliance,
            Permission::ViewReports,
            Permission::ExportReports,
        ];

        ALL
    }

    /// Returns whether the permission changes data or grants administration.
    ///
    /// Privileged permissions need an explicitly assigned role.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        !matches!(
            self,
            Self::ViewQuality
                | Self::ViewSampling
                | Self::ViewProduction
                | Self::ViewBuyers
                | Self::ViewCompliance
                | Self::ViewReports
        )
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Returns whether `granted` satisfies `required`.
///
/// [`Permission::ViewAllData`] satisfies every requirement.
#[must_use]
pub fn has_permission(granted: &BTreeSet<Permission>, required: Permission) -> bool {
    granted.contains(&required) || granted.contains(&Permission::ViewAllData)
}

/// Organizational access boundary gating a group of UI features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentId {
    /// User and role administration.
    Admin,
    /// Quality inspection.
    Quality,
    /// Sampling, design tracking and merchandising.
    Sampling,
    /// Production and compliance.
    Production,
}

impl DepartmentId {
    /// Returns a stable storage value for this department.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Quality => "quality",
            Self::Sampling => "sampling",
            Self::Production => "production",
        }
    }

    /// Returns all known departments.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Admin, Self::Quality, Self::Sampling, Self::Production]
    }
}

impl FromStr for DepartmentId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|department| department.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown department '{value}'")))
    }
}

/// UI surfaces gated by a single permission each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    /// User account administration screen.
    UserManagement,
    /// Role administration screen.
    RoleManagement,
    /// Quality overview dashboard.
    QualityDashboard,
    /// New inspection form.
    InspectionForm,
    /// Defect recording on an open inspection.
    InspectionEdit,
    /// Inspection approval queue.
    InspectionApproval,
    /// Sampling overview dashboard.
    SamplingDashboard,
    /// Sample and design tracker.
    SampleTracking,
    /// Buyer and merchandising management.
    BuyerManagement,
    /// Production overview dashboard.
    ProductionDashboard,
    /// Compliance audit register.
    ComplianceAudits,
    /// Report viewer.
    Reports,
    /// Report export.
    ReportExport,
}

impl FeatureId {
    /// Returns a stable storage value for this feature.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserManagement => "user_management",
            Self::RoleManagement => "role_management",
            Self::QualityDashboard => "quality_dashboard",
            Self::InspectionForm => "inspection_form",
            Self::InspectionEdit => "inspection_edit",
            Self::InspectionApproval => "inspection_approval",
            Self::SamplingDashboard => "sampling_dashboard",
            Self::SampleTracking => "sample_tracking",
            Self::BuyerManagement => "buyer_management",
            Self::ProductionDashboard => "production_dashboard",
            Self::ComplianceAudits => "compliance_audits",
            Self::Reports => "reports",
            Self::ReportExport => "report_export",
        }
    }

    /// Returns all known features.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::UserManagement,
            Self::RoleManagement,
            Self::QualityDashboard,
            Self::InspectionForm,
            Self::InspectionEdit,
            Self::InspectionApproval,
            Self::SamplingDashboard,
            Self::SampleTracking,
            Self::BuyerManagement,
            Self::ProductionDashboard,
            Self::ComplianceAudits,
            Self::Reports,
            Self::ReportExport,
        ]
    }
}

impl FromStr for FeatureId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|feature| feature.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown feature '{value}'")))
    }
}

/// Built-in role identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    /// Full access to every department and permission.
    Admin,
    /// Runs and approves quality inspections.
    QualityManager,
    /// Records quality inspections.
    QualityInspector,
    /// Leads the sampling team and buyer relations.
    SamplingManager,
    /// Tracks samples and designs.
    SamplingTeam,
    /// Least-privileged read-only role.
    Viewer,
}

impl RoleId {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::QualityManager => "quality_manager",
            Self::QualityInspector => "quality_inspector",
            Self::SamplingManager => "sampling_manager",
            Self::SamplingTeam => "sampling_team",
            Self::Viewer => "viewer",
        }
    }

    /// Returns all built-in roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Admin,
            Self::QualityManager,
            Self::QualityInspector,
            Self::SamplingManager,
            Self::SamplingTeam,
            Self::Viewer,
        ]
    }
}

impl FromStr for RoleId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown role '{value}'")))
    }
}
