use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::application::ports::{SessionStore, SessionStoreError, SessionUpdate};
use crate::domain::{Session, SessionId};

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(2 * 60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

struct StoredSession {
    session: Session,
    last_active: Instant,
}

impl StoredSession {
    fn new(session: Session) -> Self {
        Self {
            session,
            last_active: Instant::now(),
        }
    }

    fn is_expired(&self, idle_ttl: Duration) -> bool {
        self.last_active.elapsed() > idle_ttl
    }

    fn touch(&mut self) -> &mut Session {
        self.last_active = Instant::now();
        &mut self.session
    }
}

/// Process-local session table. Everything is lost on restart.
///
/// Sessions untouched for `idle_ttl` are dropped, and once `max_sessions` is
/// reached the least recently used one makes room for a new one.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, StoredSession>>,
    idle_ttl: Duration,
    max_sessions: usize,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limits(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    fn evict(&self, sessions: &mut HashMap<SessionId, StoredSession>) {
        let before = sessions.len();
        sessions.retain(|_, stored| !stored.is_expired(self.idle_ttl));

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, stored)| stored.last_active)
                .map(|(id, _)| *id)
            else {
                break;
            };
            sessions.remove(&oldest);
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = sessions.len(), "Evicted sessions");
        }
    }

    /// Live entry for `id`, dropping it first if it has idled out.
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<SessionId, StoredSession>,
        id: SessionId,
    ) -> Option<&'a mut StoredSession> {
        if sessions
            .get(&id)
            .is_some_and(|stored| stored.is_expired(self.idle_ttl))
        {
            sessions.remove(&id);
            tracing::debug!(session_id = %id, "Session expired");
            return None;
        }
        sessions.get_mut(&id)
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    async fn create(&self, session: &Session) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(SessionStoreError::ConstraintViolation(format!(
                "session {} already exists",
                session.id
            )));
        }

        self.evict(&mut sessions);
        sessions.insert(session.id, StoredSession::new(session.clone()));
        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Option<Session>, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        Ok(self
            .live_entry(&mut sessions, id)
            .map(|stored| stored.touch().clone()))
    }

    #[instrument(skip(self, update), fields(session_id = %id))]
    async fn update(
        &self,
        id: SessionId,
        update: SessionUpdate,
    ) -> Result<Session, SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        let stored = self
            .live_entry(&mut sessions, id)
            .ok_or_else(|| SessionStoreError::NotFound(id.to_string()))?;

        let session = stored.touch();
        update(session);
        Ok(session.clone())
    }

    async fn remove(&self, id: SessionId) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.write().await.remove(&id).is_some())
    }
}
