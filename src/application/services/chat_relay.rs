use std::sync::Arc;

use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream};
use crate::domain::ConversationHistory;

/// Forwards a conversation, prefixed by a fixed instruction, to the model.
pub struct ChatRelay<L>
where
    L: LlmClient,
{
    llm_client: Arc<L>,
    system_prompt: String,
}

impl<L> ChatRelay<L>
where
    L: LlmClient,
{
    pub fn new(llm_client: Arc<L>, system_prompt: String) -> Self {
        Self {
            llm_client,
            system_prompt,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Appends `content` as a user turn, asks the model, and appends the
    /// trimmed reply as an assistant turn. On failure the user turn stays in
    /// the history and no assistant turn is added.
    #[tracing::instrument(skip_all, fields(history_len = history.len()))]
    pub async fn send(
        &self,
        history: &mut ConversationHistory,
        content: &str,
    ) -> Result<String, ChatRelayError> {
        history.push_user(content);
        let messages = history.with_instruction(&self.system_prompt);

        let reply = self
            .llm_client
            .complete(&messages)
            .await
            .map_err(ChatRelayError::Completion)?;

        self.record_reply(history, &reply)
    }

    /// Streaming variant of [`ChatRelay::send`]. The user turn is appended
    /// immediately; the caller passes the accumulated text to
    /// [`ChatRelay::record_reply`] once the stream ends.
    #[tracing::instrument(skip_all, fields(history_len = history.len()))]
    pub async fn send_stream(
        &self,
        history: &mut ConversationHistory,
        content: &str,
    ) -> Result<LlmTokenStream, ChatRelayError> {
        history.push_user(content);
        let messages = history.with_instruction(&self.system_prompt);

        self.llm_client
            .complete_stream(&messages)
            .await
            .map_err(ChatRelayError::Completion)
    }

    pub fn record_reply(
        &self,
        history: &mut ConversationHistory,
        reply: &str,
    ) -> Result<String, ChatRelayError> {
        let reply = reply.trim();
        if reply.is_empty() {
            tracing::warn!("Model returned an empty reply");
            return Err(ChatRelayError::EmptyResponse);
        }

        history.push_assistant(reply);
        Ok(reply.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChatRelayError {
    #[error("completion: {0}")]
    Completion(LlmClientError),
    #[error("empty response")]
    EmptyResponse,
}
