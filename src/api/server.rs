//! API server implementation

use std::net::SocketAddr;

use axum::Router;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::storage::SharedClassRepository;

use super::routes::{create_router, AppState};

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to bind to address
    #[error("Failed to bind: {0}")]
    BindError(#[source] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    ServeError(#[source] std::io::Error),
}

// ============================================================================
// API Server
// ============================================================================

/// HTTP server wrapping the availability and registration routes
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Create a new server over `repo`
    pub fn new(repo: SharedClassRepository, config: ServerConfig) -> Self {
        Self {
            config,
            state: AppState::new(repo),
        }
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        if self.config.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    fn bind_address(&self) -> Result<SocketAddr, ServerError> {
        self.config.bind_address.parse().map_err(|_| {
            ServerError::ConfigError(format!("Invalid address: {}", self.config.bind_address))
        })
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.bind_address()?;
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServerError::BindError)?;

        tracing::info!(%addr, "Starting API server");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(ServerError::ServeError)?;

        tracing::info!("API server shutdown complete");
        Ok(())
    }
}
