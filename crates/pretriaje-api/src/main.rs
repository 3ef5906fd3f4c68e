use std::sync::Arc;

use jiff::Timestamp;
use tracing_subscriber::EnvFilter;

use pretriaje_api::config::Config;
use pretriaje_api::state::AppState;
use pretriaje_api::{build_router, demo};
use pretriaje_storage::{FileStore, MemoryStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    let questionnaire = config.load_questionnaire()?;

    let state = match &config.data_dir {
        Some(dir) => AppState::new(Arc::new(FileStore::open(dir)?), questionnaire),
        None => {
            tracing::warn!("no data directory configured, sessions are kept in memory");
            AppState::new(Arc::new(MemoryStore::new()), questionnaire)
        }
    };

    let now = Timestamp::now();
    demo::ensure_demo_campaign(&state, now)?;
    if config.seed_demo {
        demo::seed_sessions(&state, now)?;
    }

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(addr = %config.bind, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
