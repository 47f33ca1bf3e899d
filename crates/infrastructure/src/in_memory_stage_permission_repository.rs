use async_trait::async_trait;
use millqc_application::StagePermissionRepository;
use millqc_core::AppResult;
use millqc_domain::UserStagePermission;
use tokio::sync::RwLock;

/// In-memory copy of the administrator-managed stage grants.
///
/// Records keep their stored order so the first match wins, as in the source collection.
#[derive(Debug, Default)]
pub struct InMemoryStagePermissionRepository {
    records: RwLock<Vec<UserStagePermission>>,
}

impl InMemoryStagePermissionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with `records`.
    #[must_use]
    pub fn with_records(records: Vec<UserStagePermission>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Replaces every record, e.g. after an administrator export is reloaded.
    pub async fn replace_all(&self, records: Vec<UserStagePermission>) {
        *self.records.write().await = records;
    }
}

#[async_trait]
impl StagePermissionRepository for InMemoryStagePermissionRepository {
    async fn list_stage_permissions(&self) -> AppResult<Vec<UserStagePermission>> {
        Ok(self.records.read().await.clone())
    }
}
