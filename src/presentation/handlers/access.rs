use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::LlmClient;
use crate::domain::Session;
use crate::infrastructure::observability::mask_license_code;
use crate::presentation::state::AppState;

use super::error::ApiError;
use super::messages;
use super::session::load_session;

#[derive(Deserialize)]
pub struct AccessRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Serialize)]
pub struct AccessResponse {
    pub authenticated: bool,
    pub message: &'static str,
}

#[tracing::instrument(skip_all, fields(code = %mask_license_code(&request.code)))]
pub async fn unlock_handler<L>(
    State(state): State<AppState<L>>,
    headers: HeaderMap,
    Json(request): Json<AccessRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    let session = load_session(state.session_store.as_ref(), &headers).await?;

    state.access_service.authorize(&request.code)?;
    state
        .session_store
        .update(session.id, Box::new(|session: &mut Session| session.authenticate()))
        .await?;

    tracing::info!(session_id = %session.id, "Session unlocked");

    Ok((
        StatusCode::OK,
        Json(AccessResponse {
            authenticated: true,
            message: messages::LICENSE_ACCEPTED,
        }),
    ))
}
