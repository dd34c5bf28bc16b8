//! Bank Transfers API server
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌──────────────────┐    ┌────────────┐
//! │  Config  │───▶│ Logging  │───▶│ Store (PG / mem) │───▶│  Gateway   │
//! │  (YAML)  │    │(tracing) │    │  opened once     │    │  (axum)    │
//! └──────────┘    └──────────┘    └──────────────────┘    └────────────┘
//! ```
//!
//! The store handle is opened before the gateway starts and closed after it
//! has drained on Ctrl-C / SIGTERM.

use std::sync::Arc;

use anyhow::Context;

use bank_transfers::config::AppConfig;
use bank_transfers::db::{Database, schema};
use bank_transfers::gateway::{self, state::AppState};
use bank_transfers::logging::init_logging;
use bank_transfers::store::{MemoryStore, PgStore, Store};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env)?;
    let _log_guard = init_logging(&config);

    tracing::info!(env = %env, "Starting bank_transfers");

    let mut db: Option<Arc<Database>> = None;
    let store: Arc<dyn Store> = match &config.postgres {
        Some(pg) => {
            let pg_db = Arc::new(
                Database::connect(pg)
                    .await
                    .context("Failed to connect to PostgreSQL")?,
            );
            schema::init_schema(pg_db.pool()).await?;
            db = Some(pg_db.clone());
            Arc::new(PgStore::new(pg_db))
        }
        None => {
            tracing::warn!("No PostgreSQL configured, using in-memory store (data is not durable)");
            Arc::new(MemoryStore::new())
        }
    };

    let state = Arc::new(AppState::new(store));
    let result = gateway::run_server(&config.listen_addr(), state, shutdown_signal()).await;

    if let Some(db) = db {
        db.close().await;
    }
    result
}
