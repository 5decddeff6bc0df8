use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use carehome_api::app::{create_app, AppState};
use carehome_api::config::Config;
use carehome_api::jobs::{JobScheduler, PruneSessionsJob};
use carehome_api::middleware::{init_metrics, logging::init_logging};
use carehome_api::services::{bootstrap_users, OpenAiClient};
use domain::services::{AiAssistant, TextGenerator};
use persistence::{EntityStore, MemoryStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.logging);
    info!("Starting Care Home API v{}", env!("CARGO_PKG_VERSION"));

    if !init_metrics() {
        warn!("Prometheus recorder unavailable; /metrics will answer 503");
    }

    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let created = bootstrap_users(store.as_ref(), &config.bootstrap)
        .await
        .context("Failed to bootstrap users")?;
    info!(created, "User bootstrap finished");

    let generator: Option<Arc<dyn TextGenerator>> = match config.ai.api_key() {
        Some(key) => {
            let client = OpenAiClient::new(&config.ai, key).context("Failed to build AI client")?;
            info!(endpoint = client.endpoint(), model = %config.ai.model, "AI assist enabled");
            Some(Arc::new(client) as Arc<dyn TextGenerator>)
        }
        None => {
            warn!("OPENAI_API_KEY is not set; AI assist will serve fallback content");
            None
        }
    };
    let ai = AiAssistant::new(generator, config.ai.timeout());

    let addr = config.socket_addr().context("Invalid server address")?;
    let prune_interval = Duration::from_secs(config.session.prune_interval_secs.max(1));

    let state = AppState::new(config, store, ai);

    let mut scheduler = JobScheduler::new();
    scheduler.register(PruneSessionsJob::new(
        Arc::clone(&state.sessions),
        state.rate_limiter.clone(),
        prune_interval,
    ));
    scheduler.start();

    let app = create_app(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(5)).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
