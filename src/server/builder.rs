//! ServerBuilder for fluent API to build the HTTP server

use std::sync::Arc;

use anyhow::{Result, anyhow};
use axum::Router;
use tokio::net::TcpListener;

use super::router::build_router;
use super::state::AppState;
use crate::config::AppConfig;
use crate::storage::SocialStore;

/// Builder for the REST server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(AppConfig::load()?)
///     .with_store(InMemoryStore::new())
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    store: Option<Arc<dyn SocialStore>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            store: None,
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the storage backend (required)
    pub fn with_store(self, store: impl SocialStore) -> Self {
        self.with_store_arc(Arc::new(store))
    }

    pub fn with_store_arc(mut self, store: Arc<dyn SocialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the shared state without a router
    pub fn build_state(&self) -> Result<AppState> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow!("A storage backend is required. Call .with_store() first."))?;

        Ok(AppState::new(store, Arc::new(self.config.clone())))
    }

    /// Build the final REST router
    pub fn build(self) -> Result<Router> {
        Ok(build_router(self.build_state()?))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
