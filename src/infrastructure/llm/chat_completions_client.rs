use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream};
use crate::domain::ChatTurn;
use crate::presentation::config::{LlmProvider, LlmSettings};

use super::sse::{SseLineBuffer, SsePayload};

const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any endpoint speaking the OpenAI `chat/completions` protocol.
pub struct ChatCompletionsClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: usize,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        max_tokens: usize,
        temperature: f32,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            max_tokens,
            temperature,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn post(
        &self,
        messages: &[ChatTurn],
        stream: bool,
    ) -> Result<reqwest::Response, LlmClientError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    #[tracing::instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String, LlmClientError> {
        let response = self.post(messages, false).await?;

        let completion_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        completion_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))
    }

    #[tracing::instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    async fn complete_stream(
        &self,
        messages: &[ChatTurn],
    ) -> Result<LlmTokenStream, LlmClientError> {
        let response = self.post(messages, true).await?;
        let mut bytes = response.bytes_stream();

        let token_stream = async_stream::stream! {
            let mut lines = SseLineBuffer::default();

            while let Some(chunk_result) = bytes.next().await {
                let chunk = match chunk_result {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(LlmClientError::ApiRequestFailed(e.to_string()));
                        return;
                    }
                };

                for line in lines.push(&chunk) {
                    match SsePayload::parse(&line) {
                        SsePayload::Token(token) => yield Ok(token),
                        SsePayload::Done => return,
                        SsePayload::Skip => {}
                    }
                }
            }
        };

        Ok(Box::pin(token_stream))
    }
}

pub fn create_llm_client(settings: &LlmSettings) -> Result<ChatCompletionsClient, LlmClientError> {
    let configured_url = settings
        .base_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty());

    let base_url = match settings.provider {
        LlmProvider::DeepSeek => configured_url.unwrap_or(DEEPSEEK_BASE_URL).to_string(),
        LlmProvider::OpenAi => configured_url.unwrap_or(OPENAI_BASE_URL).to_string(),
        LlmProvider::Compatible => configured_url
            .ok_or_else(|| {
                LlmClientError::Configuration(
                    "base_url required for compatible provider".to_string(),
                )
            })?
            .to_string(),
    };

    if settings.api_key.is_empty() {
        tracing::warn!(provider = ?settings.provider, "LLM api key is empty; chat requests will be rejected upstream");
    }

    Ok(ChatCompletionsClient::new(
        base_url,
        settings.api_key.clone(),
        settings.chat_model.clone(),
        settings.max_tokens,
        settings.temperature,
    ))
}
