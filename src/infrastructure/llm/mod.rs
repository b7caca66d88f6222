mod chat_completions_client;
mod sse;

pub use chat_completions_client::{ChatCompletionsClient, create_llm_client};
pub use sse::{SseLineBuffer, SsePayload};
