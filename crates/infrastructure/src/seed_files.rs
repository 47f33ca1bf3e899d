//! Loaders for administrator-managed JSON exports read at process start.

use std::path::Path;

use millqc_core::{AppError, AppResult};
use millqc_domain::{RoleId, UserStagePermission};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

/// One explicit role assignment in a seed file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleAssignmentSeed {
    /// Email the role applies to.
    pub email: String,
    /// Assigned role.
    pub role: RoleId,
}

/// Reads the stage grant export.
pub async fn load_stage_permissions(path: &Path) -> AppResult<Vec<UserStagePermission>> {
    let records: Vec<UserStagePermission> = read_json(path).await?;
    info!(
        path = %path.display(),
        records = records.len(),
        "loaded stage permission records"
    );
    Ok(records)
}

/// Reads the explicit role assignment export.
pub async fn load_role_assignments(path: &Path) -> AppResult<Vec<(String, RoleId)>> {
    let seeds: Vec<RoleAssignmentSeed> = read_json(path).await?;
    info!(
        path = %path.display(),
        assignments = seeds.len(),
        "loaded role assignments"
    );
    Ok(seeds
        .into_iter()
        .map(|seed| (seed.email, seed.role))
        .collect())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|error| {
        AppError::Internal(format!("failed to read '{}': {error}", path.display()))
    })?;

    serde_json::from_str(contents.as_str()).map_err(|error| {
        AppError::Validation(format!("invalid JSON in '{}': {error}", path.display()))
    })
}
