use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use chemimaster::application::ports::{Clock, SessionStore};
use chemimaster::application::services::{AccessService, ChatRelay, LicenseGate};
use chemimaster::infrastructure::clock::SystemClock;
use chemimaster::infrastructure::llm::create_llm_client;
use chemimaster::infrastructure::observability::{TracingConfig, init_tracing};
use chemimaster::infrastructure::persistence::InMemorySessionStore;
use chemimaster::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(
        &TracingConfig::from_settings(&settings.logging, environment),
        settings.server.port,
    )?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let license_gate = Arc::new(LicenseGate::new(
        clock,
        settings.license.prefix.clone(),
        settings.license.secret.clone(),
        settings.license.validity_days,
    ));
    let access_service = Arc::new(AccessService::new(
        license_gate,
        settings.admin.password.clone(),
        Some(settings.license.bypass_code.clone()),
    ));

    let llm_client = Arc::new(create_llm_client(&settings.llm)?);
    let chat_relay = Arc::new(ChatRelay::new(
        llm_client,
        settings.llm.system_prompt.clone(),
    ));

    let session_store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::with_limits(
        Duration::from_secs(settings.session.idle_ttl_minutes * 60),
        settings.session.max_sessions,
    ));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server host/port")?;

    let state = AppState {
        access_service,
        chat_relay,
        session_store,
        settings,
    };

    let router = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
