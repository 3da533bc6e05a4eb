//! API server implementation.

use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Address to bind to.
    pub bind_address: SocketAddr,
    /// Request timeout. One provisioning request spans several upstream
    /// round-trips, so this must exceed the worst-case chain of
    /// connector timeouts (config validation enforces that).
    pub request_timeout: Duration,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            request_timeout: Duration::from_secs(240),
        }
    }
}

/// API server.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server.
    pub fn new(state: AppState, config: ApiServerConfig) -> Self {
        Self { config, state }
    }

    /// Creates a new API server with default configuration.
    pub fn with_state(state: AppState) -> Self {
        Self::new(state, ApiServerConfig::default())
    }

    /// Builds the router.
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(CatchPanicLayer::new())
    }

    /// Runs the server.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let app = self.router();
        let addr = self.config.bind_address;

        info!("Starting API server on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("API server shut down gracefully");
        Ok(())
    }
}

/// Default shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ob_connectors::{MockEmailConnector, MockPlatformConnector, RoleId};
    use ob_core::{Provisioner, ProvisioningSettings};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_router_creation() {
        let settings = ProvisioningSettings {
            role_id: RoleId(3),
            email_from: "onboarding@example.com".to_string(),
            email_subject: "Welcome".to_string(),
            email_body_template: "Set up here: {reset_link}".to_string(),
        };
        let provisioner = Provisioner::new(
            Arc::new(MockPlatformConnector::new()),
            Arc::new(MockEmailConnector::new()),
            settings,
        );
        let state = AppState::new(Arc::new(provisioner));

        let server = ApiServer::with_state(state);
        let _router = server.router();
    }
}
