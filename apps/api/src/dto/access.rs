use millqc_application::{AccessSummary, StageVisibility, StageVisibilitySource};
use millqc_core::UserIdentity;
use millqc_domain::{Role, UnprovisionedStagePolicy};
use serde::Serialize;
use ts_rs::TS;

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
    pub accessible_departments: Vec<String>,
    pub is_admin: bool,
}

impl From<&Role> for RoleResponse {
    fn from(value: &Role) -> Self {
        Self {
            id: value.id().as_str().to_owned(),
            name: value.name().as_str().to_owned(),
            description: value.description().to_owned(),
            permissions: value
                .permissions()
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            accessible_departments: value
                .accessible_departments()
                .iter()
                .map(|department| department.as_str().to_owned())
                .collect(),
            is_admin: value.is_admin(),
        }
    }
}

/// Navigation-ready access summary for the current user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-summary-response.ts"
)]
pub struct AccessSummaryResponse {
    pub subject: String,
    pub email: Option<String>,
    pub role: RoleResponse,
    pub role_source: String,
    pub departments: Vec<String>,
    pub features: Vec<String>,
}

impl AccessSummaryResponse {
    pub fn new(user: &UserIdentity, summary: &AccessSummary) -> Self {
        Self {
            subject: user.subject().to_owned(),
            email: user.email().map(str::to_owned),
            role: RoleResponse::from(&summary.role.role),
            role_source: summary.role.source.as_str().to_owned(),
            departments: summary
                .departments
                .iter()
                .map(|department| department.as_str().to_owned())
                .collect(),
            features: summary
                .features
                .iter()
                .map(|feature| feature.as_str().to_owned())
                .collect(),
        }
    }
}

/// Result of a single department or feature check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-check-response.ts"
)]
pub struct AccessCheckResponse {
    pub target: String,
    pub allowed: bool,
}

/// Stages the current user may act on.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/stage-visibility-response.ts"
)]
pub struct StageVisibilityResponse {
    pub stages: Vec<String>,
    pub source: String,
}

impl From<StageVisibility> for StageVisibilityResponse {
    fn from(value: StageVisibility) -> Self {
        let source = match value.source {
            StageVisibilitySource::Assigned => "assigned",
            StageVisibilitySource::Unprovisioned(UnprovisionedStagePolicy::ShowAll) => {
                "unprovisioned_show_all"
            }
            StageVisibilitySource::Unprovisioned(UnprovisionedStagePolicy::Deny) => {
                "unprovisioned_deny"
            }
        };

        Self {
            stages: value.stages,
            source: source.to_owned(),
        }
    }
}
