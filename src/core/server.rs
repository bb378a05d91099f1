//! Server Implementation
//!
//! HTTP server startup and lifecycle.

use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let app = crate::api::build_app(self.state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        tracing::info!("Storefront server starting on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        Ok(())
    }
}
