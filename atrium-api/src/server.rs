//! HTTP server for the control plane.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::routes::create_router;
use crate::state::{AppState, Services};

/// API server.
pub struct ApiServer {
    config: ApiConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server over the given collaborators.
    #[must_use]
    pub fn new(config: ApiConfig, services: Services) -> Self {
        let state = Arc::new(AppState::new(config.clone(), services));
        Self { config, state }
    }

    /// Creates a server over prepared state.
    #[must_use]
    pub fn with_state(config: ApiConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Binds the configured address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or already in use.
    pub async fn bind(&self) -> Result<TcpListener, ApiError> {
        let addr = self.config.bind_address();
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|e| ApiError::Internal(format!("Invalid bind address: {e}")))?;

        TcpListener::bind(socket_addr)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to bind to {addr}: {e}")))
    }

    /// Runs the server until the process is killed.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or run.
    pub async fn run(self) -> Result<(), ApiError> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server until `shutdown_signal` resolves, then drains
    /// in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or run.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if serving fails.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ApiError> {
        let app = create_router(self.state);
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "API server listening");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {e}")))?;

        warn!("API server shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn test_api_server_with_state() {
        let fixture = Fixture::new();
        let state = fixture.state();
        let server = ApiServer::with_state(state.config.clone(), Arc::clone(&state));

        assert!(Arc::ptr_eq(server.state(), &state));
    }

    #[tokio::test]
    async fn test_invalid_bind_address() {
        let fixture = Fixture::new();
        let mut config = fixture.state().config.clone();
        config.host = "not an address".to_string();
        let server = ApiServer::new(config, fixture.state().services().clone());

        let err = server.bind().await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown_signal() {
        let fixture = Fixture::new();
        let mut config = fixture.state().config.clone();
        config.host = "127.0.0.1".to_string();
        config.port = 0;
        let server = ApiServer::new(config, fixture.state().services().clone());
        let listener = server.bind().await.unwrap();

        server.serve(listener, async {}).await.unwrap();
    }
}
