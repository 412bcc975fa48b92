//! Gateway server implementation.

use crate::error::GatewayError;
use crate::routes;
use crate::state::AppState;
use eamquery_core::GatewayConfig;
use tokio::net::TcpListener;

/// The gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new gateway server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Start the server and serve until Ctrl-C.
    pub async fn run(&self) -> Result<(), GatewayError> {
        let state = AppState::new(&self.config)?;
        let addr = self.config.server.bind_address();
        tracing::info!(
            address = %addr,
            upstream = state.upstream().endpoint(),
            "Starting EAM query gateway"
        );

        let app = routes::create_router(state);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| GatewayError::StartupFailed(format!("bind {addr}: {e}")))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::StartupFailed(e.to_string()))?;

        tracing::info!("Gateway stopped");
        Ok(())
    }

    /// Get the configured listen address.
    pub fn listen_address(&self) -> String {
        self.config.server.bind_address()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
