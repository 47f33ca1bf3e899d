use std::sync::Arc;

use millqc_core::AppResult;
use millqc_domain::{
    InspectionStage, Inspector, QcAssignmentTable, UnprovisionedStagePolicy,
    filter_stages_with_policy, visible_stages_for_user,
};
use tracing::warn;

use crate::StagePermissionRepository;

/// How a caller's stage list was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageVisibilitySource {
    /// An active grant listed the stages.
    Assigned,
    /// No usable grant exists and the unprovisioned policy applied.
    Unprovisioned(UnprovisionedStagePolicy),
}

/// Stages a caller may act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageVisibility {
    /// Stage labels in grant order, or every stage for the show-all fallback.
    pub stages: Vec<String>,
    /// How the list was decided.
    pub source: StageVisibilitySource,
}

impl StageVisibility {
    /// Returns whether `stage` is in the visible list.
    #[must_use]
    pub fn includes(&self, stage: InspectionStage) -> bool {
        self.stages.iter().any(|label| label == stage.as_str())
    }
}

/// Application service joining the inspector roster with stage grants.
#[derive(Clone)]
pub struct QcAssignmentService {
    table: Arc<QcAssignmentTable>,
    stage_permissions: Arc<dyn StagePermissionRepository>,
    policy: UnprovisionedStagePolicy,
}

impl QcAssignmentService {
    /// Creates a new assignment service.
    #[must_use]
    pub fn new(
        table: Arc<QcAssignmentTable>,
        stage_permissions: Arc<dyn StagePermissionRepository>,
        policy: UnprovisionedStagePolicy,
    ) -> Self {
        Self {
            table,
            stage_permissions,
            policy,
        }
    }

    /// Returns the configured policy for callers without a grant.
    #[must_use]
    pub fn policy(&self) -> UnprovisionedStagePolicy {
        self.policy
    }

    /// Returns inspectors assigned to `stage`.
    #[must_use]
    pub fn inspectors_for_stage(&self, stage: InspectionStage) -> Vec<Inspector> {
        self.table
            .inspectors_for_stage(stage)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns the stages of an inspector. Unknown ids yield nothing.
    #[must_use]
    pub fn stages_for_inspector(&self, inspector_id: &str) -> Vec<InspectionStage> {
        self.table.stages_for_inspector(inspector_id)
    }

    /// Returns the stage labels explicitly granted to `email`.
    pub async fn visible_stages_for_user(&self, email: &str) -> AppResult<Vec<String>> {
        let records = self.stage_permissions.list_stage_permissions().await?;
        Ok(visible_stages_for_user(email, &records))
    }

    /// Returns the stages `email` may act on, applying the unprovisioned policy.
    pub async fn filter_stages_for_user(&self, email: &str) -> AppResult<StageVisibility> {
        let records = self.stage_permissions.list_stage_permissions().await?;
        let visible = visible_stages_for_user(email, &records);
        if !visible.is_empty() {
            return Ok(StageVisibility {
                stages: visible,
                source: StageVisibilitySource::Assigned,
            });
        }

        if self.policy == UnprovisionedStagePolicy::ShowAll {
            warn!(email, "no active stage grant, unlocking every inspection stage");
        }

        Ok(StageVisibility {
            stages: filter_stages_with_policy(email, &records, self.policy),
            source: StageVisibilitySource::Unprovisioned(self.policy),
        })
    }
}

#[cfg(test)]
mod tests;
