use std::collections::HashMap;

use async_trait::async_trait;
use millqc_application::InspectionSessionRepository;
use millqc_core::AppResult;
use millqc_domain::InspectionSession;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory inspection session store.
#[derive(Debug, Default)]
pub struct InMemoryInspectionSessionRepository {
    sessions: RwLock<HashMap<Uuid, InspectionSession>>,
}

impl InMemoryInspectionSessionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InspectionSessionRepository for InMemoryInspectionSessionRepository {
    async fn save_session(&self, session: InspectionSession) -> AppResult<()> {
        self.sessions.write().await.insert(session.id(), session);
        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> AppResult<Option<InspectionSession>> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use millqc_application::InspectionSessionRepository;
    use millqc_domain::{DefectCatalog, InspectionSession, InspectionStage, OrderType};
    use uuid::Uuid;

    use super::InMemoryInspectionSessionRepository;

    #[tokio::test]
    async fn save_replaces_existing_session() {
        let repository = InMemoryInspectionSessionRepository::new();
        let catalog = DefectCatalog::standard().unwrap_or_else(|_| unreachable!());
        let mut session =
            InspectionSession::new(InspectionStage::Binding, "qc-3", OrderType::Production)
                .unwrap_or_else(|_| unreachable!());

        assert!(repository.save_session(session.clone()).await.is_ok());
        assert!(session.toggle_defect(&catalog, "B2").is_ok());
        assert!(repository.save_session(session.clone()).await.is_ok());

        let stored = repository.find_session(session.id()).await.ok().flatten();
        assert_eq!(stored, Some(session));
    }

    #[tokio::test]
    async fn unknown_session_is_none() {
        let repository = InMemoryInspectionSessionRepository::new();
        let found = repository.find_session(Uuid::new_v4()).await;
        assert!(matches!(found, Ok(None)));
    }
}
