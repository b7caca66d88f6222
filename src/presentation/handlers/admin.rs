use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::ports::LlmClient;
use crate::presentation::state::AppState;

use super::error::ApiError;
use super::messages;

#[derive(Deserialize)]
pub struct IssueLicenseRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct IssueLicenseResponse {
    pub code: String,
    pub valid_days: u64,
    pub message: String,
}

#[tracing::instrument(skip_all)]
pub async fn issue_license_handler<L>(
    State(state): State<AppState<L>>,
    Json(request): Json<IssueLicenseRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    let code = state.access_service.issue_license(&request.password)?;
    let valid_days = state.access_service.license_gate().validity_days();

    Ok((
        StatusCode::CREATED,
        Json(IssueLicenseResponse {
            code: code.into_string(),
            valid_days,
            message: messages::license_issued(valid_days),
        }),
    ))
}
