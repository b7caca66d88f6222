use async_trait::async_trait;

use crate::domain::{Session, SessionId};

use super::SessionStoreError;

/// Mutation run against the stored record with no other writer in between.
pub type SessionUpdate = Box<dyn FnOnce(&mut Session) + Send>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), SessionStoreError>;

    async fn get(&self, id: SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Applies `update` to the stored record atomically and returns the
    /// record as it stands afterwards. Fails with `NotFound` for unknown ids.
    async fn update(
        &self,
        id: SessionId,
        update: SessionUpdate,
    ) -> Result<Session, SessionStoreError>;

    async fn remove(&self, id: SessionId) -> Result<bool, SessionStoreError>;
}
