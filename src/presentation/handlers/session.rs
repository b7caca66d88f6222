use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::ports::{LlmClient, SessionStore};
use crate::domain::{Session, SessionId};
use crate::presentation::state::AppState;

use super::error::ApiError;

pub const SESSION_ID_HEADER: &str = "x-session-id";

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub authenticated: bool,
}

pub async fn create_session_handler<L>(
    State(state): State<AppState<L>>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    let session = Session::new();
    state.session_store.create(&session).await?;

    tracing::info!(session_id = %session.id, "Session created");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: session.id.to_string(),
            authenticated: session.authenticated,
        }),
    ))
}

#[tracing::instrument(skip_all)]
pub async fn logout_handler<L>(
    State(state): State<AppState<L>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    let id = session_id_from_headers(&headers)?;
    let session = state
        .session_store
        .update(id, Box::new(|session: &mut Session| session.logout()))
        .await?;

    tracing::info!(session_id = %id, generation = session.generation, "Session logged out");

    Ok(StatusCode::NO_CONTENT)
}

pub fn session_id_from_headers(headers: &HeaderMap) -> Result<SessionId, ApiError> {
    headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<SessionId>().ok())
        .ok_or(ApiError::MissingSession)
}

pub async fn load_session(
    store: &dyn SessionStore,
    headers: &HeaderMap,
) -> Result<Session, ApiError> {
    let id = session_id_from_headers(headers)?;
    store.get(id).await?.ok_or(ApiError::SessionNotFound)
}

pub async fn load_authenticated_session(
    store: &dyn SessionStore,
    headers: &HeaderMap,
) -> Result<Session, ApiError> {
    let session = load_session(store, headers).await?;
    if !session.authenticated {
        return Err(ApiError::NotAuthenticated);
    }
    Ok(session)
}
