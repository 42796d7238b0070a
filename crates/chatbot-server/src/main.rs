mod config;
mod error;
mod server;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_common::catalog::PgCatalog;
use chat_common::openai::LazyOpenAiClient;

use config::Config;
use error::AppError;
use server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting chatbot server");

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        base_url = %config.openai.base_url,
        model = %config.openai.model,
        timeout_ms = config.openai.default_timeout.as_millis(),
        api_key_set = config.openai.api_key.is_some(),
        "configuration loaded"
    );
    if config.openai.api_key.is_none() {
        tracing::warn!("GROQ_API_KEY is not set; chat requests will be rejected until it is");
    }

    let catalog = PgCatalog::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(AppError::from)?;
    info!(
        max_connections = config.database_max_connections,
        "catalog database connected"
    );

    let app = server::build_router(AppState {
        catalog: Arc::new(catalog),
        completion: Arc::new(LazyOpenAiClient::new(config.openai.clone())),
    });

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "HTTP server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "HTTP server error"))?;

    info!("chatbot server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
