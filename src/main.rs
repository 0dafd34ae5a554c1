//! HTTP entrypoint: binds the axum router over [`crawl_service::AppState`] and
//! runs every registered engine's cleanup exactly once on shutdown.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crawl_service::{router, AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = format!("{}:{}", config.bind_address, config.port);
    let state = AppState::build(config).await;
    let registry = state.registry.clone();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "crawl service listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    registry.cleanup_all().await;
    tracing::info!("crawl service shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
