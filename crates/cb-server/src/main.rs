//! Chatbot server — answers questions from a fixed intent table and falls
//! back to a language model for everything else.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use cb_server::config::ServerConfig;
use cb_server::routes::build_router;
use cb_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cb-server starting");

    let config = ServerConfig::load()?;
    tracing::info!(
        reply_policy = %config.reply_policy,
        max_concurrent_generations = config.max_concurrent_generations,
        generation_timeout_secs = config.generation_timeout_secs,
        "config loaded"
    );

    let state = AppState::from_config(&config).await?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("cb-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
