//! Mealwise API — dietary analysis server for restaurant menus.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mw_api::cache::{AnalysisCache, FileStorage};
use mw_api::config::ApiConfig;
use mw_api::inference::OpenAiClient;
use mw_api::routes;
use mw_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mw-api starting");

    let config = ApiConfig::load()?;

    let storage = Arc::new(FileStorage::new(config.cache_path.clone()));
    let cache = Arc::new(AnalysisCache::load(storage).await?);
    tracing::info!(
        path = %config.cache_path.display(),
        entries = cache.len(),
        "analysis cache loaded"
    );

    let api_key = std::env::var("OPENAI_API_KEY").ok();
    let model = OpenAiClient::new(config.openai.clone(), api_key)?;
    if !model.has_credential() {
        tracing::warn!("OPENAI_API_KEY not set — AI calls will fail until it is configured");
    }
    tracing::info!(model = %config.openai.model, base_url = %config.openai.base_url, "chat model configured");

    let state = AppState::new(cache, Arc::new(model), &config);
    let app = routes::build_router(state, &config.cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("mw-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
