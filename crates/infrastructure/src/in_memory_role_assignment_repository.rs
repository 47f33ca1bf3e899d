use std::collections::HashMap;

use async_trait::async_trait;
use millqc_application::RoleAssignmentRepository;
use millqc_core::{AppResult, normalize_email};
use millqc_domain::RoleId;
use tokio::sync::RwLock;

/// In-memory explicit role assignments keyed by normalized email.
#[derive(Debug, Default)]
pub struct InMemoryRoleAssignmentRepository {
    assignments: RwLock<HashMap<String, RoleId>>,
}

impl InMemoryRoleAssignmentRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with `(email, role)` pairs.
    #[must_use]
    pub fn with_assignments(assignments: impl IntoIterator<Item = (String, RoleId)>) -> Self {
        Self {
            assignments: RwLock::new(
                assignments
                    .into_iter()
                    .map(|(email, role)| (normalize_email(email.as_str()), role))
                    .collect(),
            ),
        }
    }

    /// Assigns `role` to `email`, replacing any previous assignment.
    pub async fn assign(&self, email: &str, role: RoleId) {
        self.assignments
            .write()
            .await
            .insert(normalize_email(email), role);
    }
}

#[async_trait]
impl RoleAssignmentRepository for InMemoryRoleAssignmentRepository {
    async fn find_role_for_email(&self, email: &str) -> AppResult<Option<RoleId>> {
        Ok(self
            .assignments
            .read()
            .await
            .get(normalize_email(email).as_str())
            .copied())
    }
}
