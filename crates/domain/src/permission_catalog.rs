use std::collections::{BTreeMap, BTreeSet, HashMap};

use millqc_core::{AppError, AppResult, NonEmptyString, normalize_email};
use serde::{Deserialize, Serialize};

use crate::permission::{DepartmentId, FeatureId, Permission, RoleId, has_permission};

/// Email domain recognised by the role heuristic.
pub const ORGANIZATION_EMAIL_DOMAIN: &str = "easternmills.com";

/// Local part that always maps to the admin role.
pub const ADMIN_USERNAME: &str = "erp";

/// Named bundle of permissions and department access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    description: String,
    permissions: BTreeSet<Permission>,
    accessible_departments: BTreeSet<DepartmentId>,
    is_admin: bool,
}

impl Role {
    /// Creates a validated role definition.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: impl IntoIterator<Item = Permission>,
        accessible_departments: impl IntoIterator<Item = DepartmentId>,
        is_admin: bool,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description: description.into(),
            permissions: permissions.into_iter().collect(),
            accessible_departments: accessible_departments.into_iter().collect(),
            is_admin,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the granted permissions.
    #[must_use]
    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    /// Returns the explicitly accessible departments.
    #[must_use]
    pub fn accessible_departments(&self) -> &BTreeSet<DepartmentId> {
        &self.accessible_departments
    }

    /// Returns whether the role bypasses every check.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns whether this role satisfies `required`, admin override included.
    #[must_use]
    pub fn satisfies(&self, required: Permission) -> bool {
        self.is_admin || has_permission(&self.permissions, required)
    }
}

/// Returns whether `role` can reach `department_id`.
#[must_use]
pub fn can_access_department(role: &Role, department_id: DepartmentId) -> bool {
    role.is_admin || role.accessible_departments.contains(&department_id)
}

/// Organizational department and the features it groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: NonEmptyString,
    display_name: NonEmptyString,
    features: Vec<FeatureId>,
    required_permissions: BTreeSet<Permission>,
}

impl Department {
    /// Creates a validated department definition.
    pub fn new(
        id: DepartmentId,
        name: impl Into<String>,
        display_name: impl Into<String>,
        features: Vec<FeatureId>,
        required_permissions: impl IntoIterator<Item = Permission>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            display_name: NonEmptyString::new(display_name)?,
            features,
            required_permissions: required_permissions.into_iter().collect(),
        })
    }

    /// Returns the department identifier.
    #[must_use]
    pub fn id(&self) -> DepartmentId {
        self.id
    }

    /// Returns the internal name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &NonEmptyString {
        &self.display_name
    }

    /// Returns the features in navigation order.
    #[must_use]
    pub fn features(&self) -> &[FeatureId] {
        self.features.as_slice()
    }

    /// Returns the permissions a user needs to enter the department.
    #[must_use]
    pub fn required_permissions(&self) -> &BTreeSet<Permission> {
        &self.required_permissions
    }
}

/// Immutable role, department and feature tables.
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    roles: BTreeMap<RoleId, Role>,
    departments: Vec<Department>,
    feature_permissions: HashMap<FeatureId, Permission>,
}

impl PermissionCatalog {
    /// Creates a catalog from custom tables.
    ///
    /// Role and department identifiers must be unique.
    pub fn new(
        roles: Vec<Role>,
        departments: Vec<Department>,
        feature_permissions: HashMap<FeatureId, Permission>,
    ) -> AppResult<Self> {
        let mut role_map = BTreeMap::new();
        for role in roles {
            let id = role.id();
            if role_map.insert(id, role).is_some() {
                return Err(AppError::Conflict(format!(
                    "role '{}' is defined more than once",
                    id.as_str()
                )));
            }
        }

        let mut seen_departments = BTreeSet::new();
        for department in &departments {
            if !seen_departments.insert(department.id()) {
                return Err(AppError::Conflict(format!(
                    "department '{}' is defined more than once",
                    department.id().as_str()
                )));
            }
        }

        Ok(Self {
            roles: role_map,
            departments,
            feature_permissions,
        })
    }

    /// Builds the organization's fixed tables.
    pub fn standard() -> AppResult<Self> {
        let roles = vec![
            Role::new(
                RoleId::Admin,
                "Admin",
                "Full access to every department and feature",
                Permission::all().iter().copied(),
                DepartmentId::all().iter().copied(),
                true,
            )?,
            Role::new(
                RoleId::QualityManager,
                "Quality Manager",
                "Runs, approves and reports on quality inspections",
                [
                    Permission::ViewQuality,
                    Permission::CreateInspection,
                    Permission::EditInspection,
                    Permission::ApproveInspection,
                    Permission::ViewCompliance,
                    Permission::ViewReports,
                    Permission::ExportReports,
                ],
                [DepartmentId::Quality, DepartmentId::Production],
                false,
            )?,
            Role::new(
                RoleId::QualityInspector,
                "Quality Inspector",
                "Records inspections and defects on the floor",
                [
                    Permission::ViewQuality,
                    Permission::CreateInspection,
                    Permission::EditInspection,
                ],
                [DepartmentId::Quality],
                false,
            )?,
            Role::new(
                RoleId::SamplingManager,
                "Sampling Manager",
                "Leads sampling, design tracking and buyer relations",
                [
                    Permission::ViewSampling,
                    Permission::CreateSample,
                    Permission::EditSample,
                    Permission::ViewBuyers,
                    Permission::ManageBuyers,
                    Permission::ViewReports,
                ],
                [DepartmentId::Sampling],
                false,
            )?,
            Role::new(
                RoleId::SamplingTeam,
                "Sampling Team",
                "Tracks samples and designs",
                [
                    Permission::ViewSampling,
                    Permission::CreateSample,
                    Permission::EditSample,
                    Permission::ViewBuyers,
                ],
                [DepartmentId::Sampling],
                false,
            )?,
            Role::new(
                RoleId::Viewer,
                "Viewer",
                "Read-only access to published reports",
                [Permission::ViewReports],
                [],
                false,
            )?,
        ];

        let departments = vec![
            Department::new(
                DepartmentId::Admin,
                "admin",
                "Administration",
                vec![FeatureId::UserManagement, FeatureId::RoleManagement],
                [Permission::ManageUsers],
            )?,
            Department::new(
                DepartmentId::Quality,
                "quality",
                "Quality Control",
                vec![
                    FeatureId::QualityDashboard,
                    FeatureId::InspectionForm,
                    FeatureId::InspectionEdit,
                    FeatureId::InspectionApproval,
                ],
                [Permission::ViewQuality],
            )?,
            Department::new(
                DepartmentId::Sampling,
                "sampling",
                "Sampling & Merchandising",
                vec![
                    FeatureId::SamplingDashboard,
                    FeatureId::SampleTracking,
                    FeatureId::BuyerManagement,
                ],
                [Permission::ViewSampling],
            )?,
            Department::new(
                DepartmentId::Production,
                "production",
                "Production & Compliance",
                vec![
                    FeatureId::ProductionDashboard,
                    FeatureId::ComplianceAudits,
                    FeatureId::Reports,
                    FeatureId::ReportExport,
                ],
                [Permission::ViewProduction],
            )?,
        ];

        let feature_permissions = HashMap::from([
            (FeatureId::UserManagement, Permission::ManageUsers),
            (FeatureId::RoleManagement, Permission::ManageRoles),
            (FeatureId::QualityDashboard, Permission::ViewQuality),
            (FeatureId::InspectionForm, Permission::CreateInspection),
            (FeatureId::InspectionEdit, Permission::EditInspection),
            (FeatureId::InspectionApproval, Permission::ApproveInspection),
            (FeatureId::SamplingDashboard, Permission::ViewSampling),
            (FeatureId::SampleTracking, Permission::EditSample),
            (FeatureId::BuyerManagement, Permission::ManageBuyers),
            (FeatureId::ProductionDashboard, Permission::ViewProduction),
            (FeatureId::ComplianceAudits, Permission::ViewCompliance),
            (FeatureId::Reports, Permission::ViewReports),
            (FeatureId::ReportExport, Permission::ExportReports),
        ]);

        Self::new(roles, departments, feature_permissions)
    }

    /// Returns a role by identifier.
    #[must_use]
    pub fn role(&self, id: RoleId) -> Option<&Role> {
        self.roles.get(&id)
    }

    /// Returns every role.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.values()
    }

    /// Returns a department by identifier.
    #[must_use]
    pub fn department(&self, id: DepartmentId) -> Option<&Department> {
        self.departments
            .iter()
            .find(|department| department.id() == id)
    }

    /// Returns every department in navigation order.
    #[must_use]
    pub fn departments(&self) -> &[Department] {
        self.departments.as_slice()
    }

    /// Returns the permission that gates `feature`, if mapped.
    #[must_use]
    pub fn feature_permission(&self, feature: FeatureId) -> Option<Permission> {
        self.feature_permissions.get(&feature).copied()
    }

    /// Returns whether `granted` unlocks `feature`. Unmapped features are closed.
    #[must_use]
    pub fn can_access_feature(&self, granted: &BTreeSet<Permission>, feature: FeatureId) -> bool {
        self.feature_permission(feature)
            .is_some_and(|required| has_permission(granted, required))
    }

    /// Returns whether `role` unlocks `feature`, admin override included.
    #[must_use]
    pub fn role_can_access_feature(&self, role: &Role, feature: FeatureId) -> bool {
        self.feature_permission(feature)
            .is_some_and(|required| role.satisfies(required))
    }

    /// Returns the departments `role` can reach, in navigation order.
    #[must_use]
    pub fn accessible_departments(&self, role: &Role) -> Vec<DepartmentId> {
        self.departments
            .iter()
            .map(Department::id)
            .filter(|id| can_access_department(role, *id))
            .collect()
    }

    /// Returns the features `role` can open inside its reachable departments.
    #[must_use]
    pub fn accessible_features(&self, role: &Role) -> Vec<FeatureId> {
        self.departments
            .iter()
            .filter(|department| can_access_department(role, department.id()))
            .flat_map(|department| department.features().iter().copied())
            .filter(|feature| self.role_can_access_feature(role, *feature))
            .collect()
    }

    /// Returns department features that have no gating permission.
    #[must_use]
    pub fn unmapped_features(&self) -> Vec<FeatureId> {
        self.departments
            .iter()
            .flat_map(|department| department.features().iter().copied())
            .filter(|feature| !self.feature_permissions.contains_key(feature))
            .collect()
    }
}

/// Classifies an email into a fallback role.
///
/// This is an auto-provisioning heuristic only. Anything unrecognised
/// resolves to [`RoleId::Viewer`].
#[must_use]
pub fn default_role_for_email(email: &str) -> RoleId {
    let email = normalize_email(email);
    let Some((local_part, domain)) = email.split_once('@') else {
        return RoleId::Viewer;
    };

    if local_part.is_empty() || domain != ORGANIZATION_EMAIL_DOMAIN {
        return RoleId::Viewer;
    }

    if local_part.contains("admin") || local_part == ADMIN_USERNAME {
        return RoleId::Admin;
    }

    if local_part.contains("quality") {
        return if local_part.contains("manager") {
            RoleId::QualityManager
        } else {
            RoleId::QualityInspector
        };
    }

    if local_part.contains("sampling") {
        return if local_part.contains("manager") {
            RoleId::SamplingManager
        } else {
            RoleId::SamplingTeam
        };
    }

    RoleId::Viewer
}

#[cfg(test)]
mod tests;
