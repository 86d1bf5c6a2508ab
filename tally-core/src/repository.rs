use crate::error::StoreError;
use crate::session::CheckoutSession;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared, individually locked handle to a live checkout session.
///
/// The per-session lock serializes concurrent scans against one identifier;
/// the store's own lock only guards the map of sessions.
pub type SessionHandle = Arc<RwLock<CheckoutSession>>;

/// Registry of live checkout sessions, keyed by session id.
///
/// The in-memory store never fails a write, but the trait surface allows a
/// persistent backend to.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Inserts or overwrites the entry keyed by the session's id. Idempotent.
    async fn save(&self, session: SessionHandle) -> Result<(), StoreError>;

    /// Returns the stored session handle, or `StoreError::NotFound`.
    async fn get(&self, id: Uuid) -> Result<SessionHandle, StoreError>;
}
