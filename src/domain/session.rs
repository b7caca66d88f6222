use chrono::{DateTime, Utc};

use super::{ChatTurn, ConversationHistory, SessionId};

/// Per-client state: whether the license gate has been passed and the chat
/// transcript so far.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub authenticated: bool,
    pub history: ConversationHistory,
    pub created_at: DateTime<Utc>,
    /// Bumped by every logout. A reply computed under an older generation
    /// belongs to a login that no longer exists.
    pub generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            authenticated: false,
            history: ConversationHistory::new(),
            created_at: Utc::now(),
            generation: 0,
        }
    }

    pub fn authenticate(&mut self) {
        self.authenticated = true;
    }

    /// Drops access and the transcript; the session handle stays usable.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.history.clear();
        self.generation += 1;
    }

    /// Still logged in under the login that `generation` was read from.
    pub fn is_current(&self, generation: u64) -> bool {
        self.authenticated && self.generation == generation
    }

    /// Appends `turns` to the stored transcript unless the session was logged
    /// out since `generation` was read. Returns whether anything was appended.
    pub fn append_if_current(
        &mut self,
        generation: u64,
        turns: impl IntoIterator<Item = ChatTurn>,
    ) -> bool {
        if !self.is_current(generation) {
            return false;
        }

        for turn in turns {
            self.history.push(turn);
        }
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
