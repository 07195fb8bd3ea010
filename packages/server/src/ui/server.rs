//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::RelayEngine;

use super::{
    config::ServerConfig,
    handler::{health_check, relay_state, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// WebSocket watch-party relay server
///
/// # Example
///
/// ```ignore
/// let engine = Arc::new(RelayEngine::new(registry, playback_repository));
/// let server = Server::new(engine, ServerConfig::default());
/// server.run().await?;
/// ```
pub struct Server {
    /// RelayEngine（接続のライフサイクルとメッセージ中継）
    engine: Arc<RelayEngine>,
    config: ServerConfig,
}

impl Server {
    pub fn new(engine: Arc<RelayEngine>, config: ServerConfig) -> Self {
        Self { engine, config }
    }

    /// Build the router: the WebSocket endpoint plus the HTTP API
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            engine: self.engine.clone(),
            origin_policy: self.config.origin_policy.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route(&self.config.path, get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/state", get(relay_state))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind to the configured address and serve until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address or
    /// if there's an error during server execution.
    pub async fn run(self) -> Result<(), ServerError> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: bind_addr.clone(),
                source,
            })?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!("Watch party relay listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}{}", local_addr, self.config.path);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
