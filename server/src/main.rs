use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gateway_service::{AppState, create_router};
use mitigation::{ColdStartNotifier, LogNotifier, WebhookNotifier};
use tracing_subscriber::EnvFilter;
use upstream::HttpFetcher;

mod config;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let gateway = config.gateway_config()?;
    tracing::info!(
        upstream = %gateway.upstream.url(),
        instance = %gateway.instance,
        "starting gateway"
    );

    let fetcher = Arc::new(HttpFetcher::new(
        config.client_name.clone(),
        config.client_version.clone(),
    ));
    let notifier: Arc<dyn ColdStartNotifier> = match &config.cold_start_webhook {
        Some(endpoint) => Arc::new(WebhookNotifier::new(endpoint.clone())?),
        None => Arc::new(LogNotifier),
    };
    let app = create_router(AppState::new(gateway, fetcher, notifier));

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding to {}", config.listen))?;
    tracing::info!("Server listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running gateway")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install Ctrl+C handler");
    }
}
