use std::sync::Arc;

use millqc_core::{AppError, AppResult, UserIdentity};
use millqc_domain::{
    DepartmentId, FeatureId, Permission, PermissionCatalog, Role, RoleId, can_access_department,
    default_role_for_email,
};
use tracing::debug;

use crate::RoleAssignmentRepository;

/// Where a resolved role came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSource {
    /// An administrator assigned the role.
    Explicit,
    /// The email heuristic picked the role.
    EmailHeuristic,
}

impl RoleSource {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::EmailHeuristic => "email_heuristic",
        }
    }
}

/// Role resolved for one caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRole {
    /// Role definition.
    pub role: Role,
    /// How the role was resolved.
    pub source: RoleSource,
}

impl ResolvedRole {
    /// Returns whether the caller holds `permission`.
    ///
    /// A role inferred from the email address only grants read permissions.
    #[must_use]
    pub fn satisfies(&self, permission: Permission) -> bool {
        match self.source {
            RoleSource::Explicit => self.role.satisfies(permission),
            RoleSource::EmailHeuristic => {
                !permission.is_privileged() && self.role.satisfies(permission)
            }
        }
    }
}

/// Everything the UI needs to render navigation for a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessSummary {
    /// Resolved role.
    pub role: ResolvedRole,
    /// Reachable departments in navigation order.
    pub departments: Vec<DepartmentId>,
    /// Openable features in navigation order.
    pub features: Vec<FeatureId>,
}

/// Application service for role, department and feature checks.
#[derive(Clone)]
pub struct AccessService {
    catalog: Arc<PermissionCatalog>,
    role_assignments: Arc<dyn RoleAssignmentRepository>,
}

impl AccessService {
    /// Creates a new access service.
    #[must_use]
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        role_assignments: Arc<dyn RoleAssignmentRepository>,
    ) -> Self {
        Self {
            catalog,
            role_assignments,
        }
    }

    /// Returns the catalog backing this service.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        self.catalog.as_ref()
    }

    /// Resolves the caller's role, preferring an explicit assignment.
    pub async fn resolve_role(&self, actor: &UserIdentity) -> AppResult<ResolvedRole> {
        let email = actor.email().unwrap_or_default();

        let explicit = if email.is_empty() {
            None
        } else {
            self.role_assignments.find_role_for_email(email).await?
        };

        let (role_id, source) = match explicit {
            Some(role_id) => (role_id, RoleSource::Explicit),
            None => (default_role_for_email(email), RoleSource::EmailHeuristic),
        };

        let role = match self.catalog.role(role_id) {
            Some(role) => role.clone(),
            None => self.catalog.role(RoleId::Viewer).cloned().ok_or_else(|| {
                AppError::Internal("permission catalog has no viewer role".to_owned())
            })?,
        };

        debug!(
            subject = actor.subject(),
            role = role.id().as_str(),
            source = source.as_str(),
            "resolved role"
        );

        Ok(ResolvedRole { role, source })
    }

    /// Returns whether the caller holds `permission`.
    pub async fn has_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<bool> {
        Ok(self.resolve_role(actor).await?.satisfies(permission))
    }

    /// Ensures the caller holds `permission`.
    pub async fn require_permission(
        &self,
        actor: &UserIdentity,
        permission: Permission,
    ) -> AppResult<()> {
        let resolved = self.resolve_role(actor).await?;
        if resolved.satisfies(permission) {
            return Ok(());
        }

        if resolved.source == RoleSource::EmailHeuristic && resolved.role.satisfies(permission) {
            return Err(AppError::Forbidden(format!(
                "subject '{}' needs an assigned role for permission '{}'",
                actor.subject(),
                permission.as_str()
            )));
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' with role '{}' is missing permission '{}'",
            actor.subject(),
            resolved.role.id().as_str(),
            permission.as_str()
        )))
    }

    /// Returns whether the caller can reach `department_id`.
    pub async fn can_access_department(
        &self,
        actor: &UserIdentity,
        department_id: DepartmentId,
    ) -> AppResult<bool> {
        let resolved = self.resolve_role(actor).await?;
        Ok(can_access_department(&resolved.role, department_id))
    }

    /// Returns whether the caller can open `feature`.
    pub async fn can_access_feature(
        &self,
        actor: &UserIdentity,
        feature: FeatureId,
    ) -> AppResult<bool> {
        let resolved = self.resolve_role(actor).await?;
        Ok(self.feature_open_to(&resolved, feature))
    }

    /// Returns the caller's role with reachable departments and features.
    pub async fn access_summary(&self, actor: &UserIdentity) -> AppResult<AccessSummary> {
        let role = self.resolve_role(actor).await?;
        let departments = self.catalog.accessible_departments(&role.role);
        let features = self
            .catalog
            .accessible_features(&role.role)
            .into_iter()
            .filter(|feature| self.feature_open_to(&role, *feature))
            .collect();

        Ok(AccessSummary {
            role,
            departments,
            features,
        })
    }

    fn feature_open_to(&self, resolved: &ResolvedRole, feature: FeatureId) -> bool {
        self.catalog
            .feature_permission(feature)
            .is_some_and(|required| resolved.satisfies(required))
    }
}
