use std::sync::Arc;

use crate::application::ports::{LlmClient, SessionStore};
use crate::application::services::{AccessService, ChatRelay};
use crate::presentation::config::Settings;

pub struct AppState<L>
where
    L: LlmClient,
{
    pub access_service: Arc<AccessService>,
    pub chat_relay: Arc<ChatRelay<L>>,
    pub session_store: Arc<dyn SessionStore>,
    pub settings: Settings,
}

impl<L> Clone for AppState<L>
where
    L: LlmClient,
{
    fn clone(&self) -> Self {
        Self {
            access_service: Arc::clone(&self.access_service),
            chat_relay: Arc::clone(&self.chat_relay),
            session_store: Arc::clone(&self.session_store),
            settings: self.settings.clone(),
        }
    }
}
