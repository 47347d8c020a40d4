use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use fleet_rendezvous::api::{self, AppState};
use fleet_rendezvous::config::{Config, ConfigError};
use fleet_rendezvous::domain::repositories::MailboxStore;
use fleet_rendezvous::infrastructure::repositories::InMemoryMailboxStore;

/// Fatal errors raised before or while serving
#[derive(Debug, Error)]
enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("Server failed: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Load configuration (reads .env if present)
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Mailbox lives for the whole process
    let store: Arc<dyn MailboxStore> = Arc::new(InMemoryMailboxStore::new());
    let state = AppState::new(store, config.max_agents);
    match config.max_agents {
        Some(limit) => tracing::info!(limit, "Agent registry bounded"),
        None => tracing::info!("Agent registry unbounded"),
    }

    let app = api::router(state, &config);

    // Start server
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT. Shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM. Shutting down..."),
    }
}
