use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::SessionStoreError;
use crate::application::services::{AccessError, ChatRelayError};

use super::messages;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every failure a handler reports. Rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("missing or malformed session id")]
    MissingSession,
    #[error("session not found")]
    SessionNotFound,
    #[error("session is not authenticated")]
    NotAuthenticated,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Relay(#[from] ChatRelayError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingSession | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::NotAuthenticated => StatusCode::FORBIDDEN,
            ApiError::Access(AccessError::CodeRequired | AccessError::PasswordRequired) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Access(AccessError::InvalidLicense | AccessError::InvalidPassword) => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Relay(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(SessionStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(SessionStoreError::ConstraintViolation(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text shown to the end user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Access(AccessError::InvalidLicense) => messages::INVALID_LICENSE.to_string(),
            ApiError::Access(AccessError::InvalidPassword) => {
                messages::INVALID_ADMIN_PASSWORD.to_string()
            }
            ApiError::NotAuthenticated => messages::LICENSE_REQUIRED.to_string(),
            ApiError::Relay(ChatRelayError::EmptyResponse) => messages::EMPTY_RESPONSE.to_string(),
            ApiError::Relay(ChatRelayError::Completion(e)) => messages::relay_failed(e),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status, "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.user_message(),
            }),
        )
            .into_response()
    }
}
