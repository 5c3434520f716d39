//! Task API server binary.
//!
//! Loads configuration from `$TASKDECK_CONFIG` (when set), opens the
//! SQLite task store, and serves the HTTP API until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use taskdeck::{ApiServer, AppConfig, AppState, InstructionGenerator, SqliteTaskStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var_os("TASKDECK_CONFIG").map(PathBuf::from);
    let config = AppConfig::load_or_default(config_path.as_deref())?;

    let db_path = config.database.resolved_path();
    tracing::info!(path = %db_path.display(), "opening task store");
    let store = Arc::new(SqliteTaskStore::open(&db_path)?);

    let textgen = InstructionGenerator::from_config(&config.textgen)?.map(Arc::new);
    if textgen.is_none() {
        tracing::info!("text generation disabled");
    }

    let state = AppState::new(store, textgen);
    let server = ApiServer::start(state, &config.http.host, config.http.port).await?;
    tracing::info!("taskdeck-server ready on http://{}", server.addr());

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    server.shutdown();
    Ok(())
}
