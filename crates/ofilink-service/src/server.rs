//! Server setup and lifecycle management

use crate::api::{build_router, AppState};
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use ofilink_store::{ensure_initialized, DocumentStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// OFILINK API server
pub struct Server {
    config: ServiceConfig,
    data_file: PathBuf,
    store: Arc<DocumentStore>,
}

impl Server {
    /// Create a new server bound to the configured data file
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let data_file = std::path::absolute(&config.storage.data_file)?;
        let store = Arc::new(DocumentStore::open(data_file.clone()));
        Ok(Self {
            config,
            data_file,
            store,
        })
    }

    /// Run the server until a shutdown signal arrives
    pub async fn run(self) -> Result<(), ServiceError> {
        ensure_initialized(&self.data_file).await?;

        let app = build_router(AppState::new(self.store.clone()), &self.config.server)?;
        let listener = TcpListener::bind(self.config.server.listen_addr).await?;

        tracing::info!("OFILINK 2.0 API listening on {}", listener.local_addr()?);
        tracing::info!(
            data_file = %self.data_file.display(),
            storage = self.store.backend_label(),
            cors_origins = ?self.config.server.cors_origins,
            "data store ready"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServiceError::Server(e.to_string()))?;

        tracing::info!("OFILINK API shutting down");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
