use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LlmClient, LlmTokenStream, SessionStore};
use crate::application::services::{ChatRelay, ChatRelayError};
use crate::domain::{ChatTurn, ConversationHistory, Session, SessionId};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::{ApiError, ErrorResponse};
use super::session::load_authenticated_session;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    #[serde(default)]
    pub stream: bool,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub reply: String,
    pub messages: Vec<ChatTurn>,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub messages: Vec<ChatTurn>,
}

#[derive(Serialize)]
struct StreamDone<'a> {
    reply: &'a str,
}

pub async fn transcript_handler<L>(
    State(state): State<AppState<L>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    let session = load_authenticated_session(state.session_store.as_ref(), &headers).await?;

    Ok((
        StatusCode::OK,
        Json(TranscriptResponse {
            messages: session.history.turns().to_vec(),
        }),
    ))
}

#[tracing::instrument(skip_all, fields(streaming = request.stream))]
pub async fn send_message_handler<L>(
    State(state): State<AppState<L>>,
    headers: HeaderMap,
    Json(request): Json<SendMessageRequest>,
) -> Result<Response, ApiError>
where
    L: LlmClient + 'static,
{
    let session = load_authenticated_session(state.session_store.as_ref(), &headers).await?;

    let content = request.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("message content is empty".to_string()));
    }

    tracing::debug!(
        session_id = %session.id,
        prompt = %sanitize_prompt(content),
        "Relaying chat message"
    );

    let mut pending = PendingExchange::from_snapshot(session);

    if request.stream {
        let started = state
            .chat_relay
            .send_stream(&mut pending.history, content)
            .await;
        let token_stream = match started {
            Ok(token_stream) => token_stream,
            Err(e) => {
                pending.commit(state.session_store.as_ref()).await?;
                return Err(e.into());
            }
        };

        return Ok(stream_reply(
            token_stream,
            Arc::clone(&state.chat_relay),
            Arc::clone(&state.session_store),
            pending,
            state.settings.llm.sse_keep_alive_seconds,
        ));
    }

    let result = state.chat_relay.send(&mut pending.history, content).await;
    let session = pending.commit(state.session_store.as_ref()).await?;
    let reply = result?;

    tracing::info!(session_id = %session.id, turns = session.history.len(), "Chat reply delivered");

    Ok((
        StatusCode::OK,
        Json(SendMessageResponse {
            reply,
            messages: session.history.turns().to_vec(),
        }),
    )
        .into_response())
}

/// One user message in flight. The relay works on a private copy of the
/// transcript; only the turns it adds are written back, and only if the
/// session has not been logged out meanwhile.
struct PendingExchange {
    session_id: SessionId,
    generation: u64,
    history: ConversationHistory,
    start: usize,
}

impl PendingExchange {
    fn from_snapshot(session: Session) -> Self {
        Self {
            session_id: session.id,
            generation: session.generation,
            start: session.history.len(),
            history: session.history,
        }
    }

    fn new_turns(&self) -> Vec<ChatTurn> {
        self.history.turns()[self.start..].to_vec()
    }

    async fn commit(&self, session_store: &dyn SessionStore) -> Result<Session, ApiError> {
        let generation = self.generation;
        let turns = self.new_turns();

        let session = session_store
            .update(
                self.session_id,
                Box::new(move |session: &mut Session| {
                    session.append_if_current(generation, turns);
                }),
            )
            .await?;

        if !session.is_current(generation) {
            tracing::warn!(session_id = %self.session_id, "Session logged out during the exchange; turns discarded");
            return Err(ApiError::NotAuthenticated);
        }

        Ok(session)
    }
}

/// Forwards tokens as `token` events, then a single `done` event carrying the
/// full reply, or an `error` event. The exchange is written back to the
/// session once the stream ends; the assistant turn only if it completed with
/// a non-empty reply.
fn stream_reply<L>(
    mut token_stream: LlmTokenStream,
    chat_relay: Arc<ChatRelay<L>>,
    session_store: Arc<dyn SessionStore>,
    mut pending: PendingExchange,
    keep_alive_seconds: u64,
) -> Response
where
    L: LlmClient + 'static,
{
    let sse_stream = async_stream::stream! {
        let mut accumulated_text = String::new();

        while let Some(token_result) = token_stream.next().await {
            match token_result {
                Ok(token) => {
                    accumulated_text.push_str(&token);
                    // SSE field values must not carry carriage returns.
                    yield Ok::<_, Infallible>(Event::default().event("token").data(token.replace('\r', "")));
                }
                Err(e) => {
                    tracing::error!(session_id = %pending.session_id, error = %e, "Stream token error");
                    if let Err(commit_error) = pending.commit(session_store.as_ref()).await {
                        tracing::warn!(error = %commit_error, "User turn not recorded");
                    }
                    let error = ApiError::Relay(ChatRelayError::Completion(e));
                    yield Ok(error_event(&error));
                    return;
                }
            }
        }

        let recorded = chat_relay.record_reply(&mut pending.history, &accumulated_text);
        let outcome = match pending.commit(session_store.as_ref()).await {
            Ok(_) => recorded.map_err(ApiError::from),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(reply) => {
                let done = serde_json::to_string(&StreamDone { reply: &reply }).unwrap_or_default();
                yield Ok(Event::default().event("done").data(done));
            }
            Err(error) => {
                yield Ok(error_event(&error));
            }
        }
    };

    Sse::new(sse_stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(keep_alive_seconds.max(1)))
                .text("keep-alive"),
        )
        .into_response()
}

fn error_event(error: &ApiError) -> Event {
    let body = serde_json::to_string(&ErrorResponse {
        error: error.user_message(),
    })
    .unwrap_or_default();
    Event::default().event("error").data(body)
}
