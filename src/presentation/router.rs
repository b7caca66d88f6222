use axum::Router;
use axum::http::HeaderName;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::LlmClient;
use crate::infrastructure::observability::{REQUEST_ID_HEADER, request_id_middleware};
use crate::presentation::handlers::{
    SESSION_ID_HEADER, create_session_handler, health_handler, issue_license_handler,
    logout_handler, send_message_handler, transcript_handler, unlock_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<L>(state: AppState<L>) -> Router
where
    L: LlmClient + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(SESSION_ID_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ]);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler::<L>))
        .route(
            "/api/v1/sessions",
            post(create_session_handler::<L>).delete(logout_handler::<L>),
        )
        .route("/api/v1/access", post(unlock_handler::<L>))
        .route("/api/v1/admin/licenses", post(issue_license_handler::<L>))
        .route(
            "/api/v1/chat/messages",
            get(transcript_handler::<L>).post(send_message_handler::<L>),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
