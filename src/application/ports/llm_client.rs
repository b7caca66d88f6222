use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

use crate::domain::ChatTurn;

pub type LlmTokenStream =
    Pin<Box<dyn Stream<Item = Result<String, LlmClientError>> + Send + 'static>>;

/// A hosted chat-completion endpoint. `messages` is sent as-is, in order.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String, LlmClientError>;

    async fn complete_stream(&self, messages: &[ChatTurn])
    -> Result<LlmTokenStream, LlmClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}
