use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use futures::stream::StreamExt;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use chemimaster::application::ports::{LlmClient, LlmClientError};
use chemimaster::domain::ChatTurn;
use chemimaster::infrastructure::llm::{ChatCompletionsClient, create_llm_client};
use chemimaster::presentation::config::{LlmProvider, Settings};

#[derive(Clone, Default)]
struct Captured {
    body: Arc<Mutex<Option<Value>>>,
    authorization: Arc<Mutex<Option<String>>>,
}

async fn completions_stub(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    *captured.authorization.lock().unwrap() = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let streaming = body["stream"].as_bool().unwrap_or(false);
    *captured.body.lock().unwrap() = Some(body);

    if streaming {
        let sse = concat!(
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Na\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"Cl\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        return ([(header::CONTENT_TYPE, "text/event-stream")], sse).into_response();
    }

    Json(json!({
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Sodium chloride." } }]
    }))
    .into_response()
}

async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_stub() -> (String, Captured) {
    let captured = Captured::default();
    let router = Router::new()
        .route("/chat/completions", post(completions_stub))
        .with_state(captured.clone());
    (spawn_server(router).await, captured)
}

fn client(base_url: String) -> ChatCompletionsClient {
    ChatCompletionsClient::new(
        base_url,
        "sk-test".to_string(),
        "deepseek-chat".to_string(),
        4096,
        0.7,
    )
}

fn conversation() -> Vec<ChatTurn> {
    vec![ChatTurn::system("tutor"), ChatTurn::user("NaCl?")]
}

#[tokio::test]
async fn given_stub_endpoint_when_completing_then_returns_content_and_sends_openai_shape() {
    let (base_url, captured) = spawn_stub().await;

    let reply = client(base_url).complete(&conversation()).await.unwrap();

    assert_eq!(reply, "Sodium chloride.");
    let body = captured.body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "deepseek-chat");
    assert_eq!(body["max_tokens"], 4096);
    assert_eq!(body["stream"], false);
    assert_eq!(
        body["messages"],
        json!([
            { "role": "system", "content": "tutor" },
            { "role": "user", "content": "NaCl?" }
        ])
    );
    assert_eq!(
        captured.authorization.lock().unwrap().as_deref(),
        Some("Bearer sk-test")
    );
}

#[tokio::test]
async fn given_stub_endpoint_when_streaming_then_yields_content_tokens() {
    let (base_url, captured) = spawn_stub().await;

    let stream = client(base_url)
        .complete_stream(&conversation())
        .await
        .unwrap();
    let tokens: Vec<String> = stream.map(|t| t.unwrap()).collect().await;

    assert_eq!(tokens, vec!["Na".to_string(), "Cl".to_string()]);
    let body = captured.body.lock().unwrap().clone().unwrap();
    assert_eq!(body["stream"], true);
}

#[tokio::test]
async fn given_rate_limited_endpoint_when_completing_then_rate_limited_error() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { StatusCode::TOO_MANY_REQUESTS }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).complete(&conversation()).await;

    assert!(matches!(result, Err(LlmClientError::RateLimited)));
}

#[tokio::test]
async fn given_unauthorized_endpoint_when_completing_then_api_request_failed_with_status() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).complete(&conversation()).await;

    match result {
        Err(LlmClientError::ApiRequestFailed(message)) => {
            assert!(message.contains("401"));
            assert!(message.contains("invalid api key"));
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn given_empty_choices_when_completing_then_invalid_response() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).complete(&conversation()).await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn given_unreachable_endpoint_when_completing_then_api_request_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client(format!("http://{}", addr))
        .complete(&conversation())
        .await;

    assert!(matches!(result, Err(LlmClientError::ApiRequestFailed(_))));
}

#[test]
fn given_default_settings_when_creating_client_then_targets_deepseek() {
    let settings = Settings::defaults().unwrap();

    let client = create_llm_client(&settings.llm).unwrap();

    assert_eq!(client.endpoint(), "https://api.deepseek.com/chat/completions");
}

#[test]
fn given_compatible_provider_without_base_url_when_creating_client_then_configuration_error() {
    let mut settings = Settings::defaults().unwrap().llm;
    settings.provider = LlmProvider::Compatible;
    settings.base_url = None;

    let result = create_llm_client(&settings);

    assert!(matches!(result, Err(LlmClientError::Configuration(_))));
}

#[test]
fn given_trailing_slash_base_url_when_creating_client_then_endpoint_normalized() {
    let mut settings = Settings::defaults().unwrap().llm;
    settings.provider = LlmProvider::OpenAi;
    settings.base_url = Some("http://localhost:1234/v1/".to_string());

    let client = create_llm_client(&settings).unwrap();

    assert_eq!(client.endpoint(), "http://localhost:1234/v1/chat/completions");
}
