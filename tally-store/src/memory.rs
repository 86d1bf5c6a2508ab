use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tally_core::{SessionHandle, SessionRepository, StoreError};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory session registry. Sessions live for the life of the process.
///
/// The store's lock only guards the map itself; mutation of an individual
/// session goes through the per-session lock inside its handle, so scans on
/// one identifier serialize without blocking other sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionStore {
    async fn save(&self, session: SessionHandle) -> Result<(), StoreError> {
        let id = session.read().await.id();
        self.sessions.write().await.insert(id, session);
        tracing::debug!(session_id = %id, "saved checkout session");
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<SessionHandle, StoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}
