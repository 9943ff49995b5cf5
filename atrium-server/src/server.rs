//! Server lifecycle: telemetry, seeding, serving and shutdown.

#![allow(clippy::used_underscore_binding)]

use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use atrium_api::{ApiServer, Services};
use atrium_core::config::ConfigLoader;
use atrium_core::error::ConfigError;
use atrium_security::account::AccountRegistry;
use atrium_security::error::SecurityError;
use atrium_security::identity::InMemoryIdentityTables;
use atrium_security::session::SignedSessionStore;
use atrium_security::tenant::InMemoryTenantDirectory;
use atrium_telemetry::logging::init_logging;
use atrium_telemetry::metrics::init_metrics;

use crate::config::{ENV_PREFIX, ServerConfig};
use crate::shutdown::{ShutdownController, setup_signal_handlers};

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Not initialized, or shut down
    Stopped,
    /// Initialized, not yet serving
    Starting,
    /// Serving requests
    Running,
    /// Draining in-flight requests
    ShuttingDown,
}

/// The in-memory stores behind the API.
struct Stores {
    accounts: Arc<AccountRegistry>,
    sessions: Arc<SignedSessionStore>,
    tenants: Arc<InMemoryTenantDirectory>,
    identities: Arc<InMemoryIdentityTables>,
}

impl Stores {
    fn services(&self) -> Services {
        Services {
            accounts: Arc::clone(&self.accounts),
            sessions: self.sessions.clone(),
            issuer: self.sessions.clone(),
            identities: self.identities.clone(),
            tenants: self.tenants.clone(),
        }
    }
}

/// The Atrium control plane server.
pub struct AtriumServer {
    config: ServerConfig,
    state: Arc<RwLock<ServerState>>,
    shutdown: ShutdownController,
    stores: Stores,
    _log_guards: Vec<WorkerGuard>,
}

impl AtriumServer {
    /// Creates a server and its stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the session configuration is unusable.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let accounts = Arc::new(AccountRegistry::new());
        let sessions = Arc::new(SignedSessionStore::new(
            config.api.session.clone(),
            Arc::clone(&accounts),
        )?);

        Ok(Self {
            config,
            state: Arc::new(RwLock::new(ServerState::Stopped)),
            shutdown: ShutdownController::new(),
            stores: Stores {
                accounts,
                sessions,
                tenants: Arc::new(InMemoryTenantDirectory::new()),
                identities: Arc::new(InMemoryIdentityTables::new()),
            },
            _log_guards: Vec::new(),
        })
    }

    /// Loads, overrides and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServerConfig, ServerError> {
        Ok(ConfigLoader::new().with_env_prefix(ENV_PREFIX).load(path)?)
    }


    /// Returns the current lifecycle state.
    pub async fn state(&self) -> ServerState {
        *self.state.read().await
    }

    /// Returns the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> &ShutdownController {
        &self.shutdown
    }

    /// Initializes telemetry and seeds the stores.
    ///
    /// # Errors
    ///
    /// Returns an error if called twice, if logging cannot start or if a
    /// bootstrap record is rejected.
    pub async fn initialize(&mut self) -> Result<(), ServerError> {
        self.transition(ServerState::Stopped, ServerState::Starting)
            .await?;

        self.init_logging()?;
        self.init_metrics();
        self.seed()?;

        info!("Atrium server initialized");
        Ok(())
    }

    fn init_logging(&mut self) -> Result<(), ServerError> {
        let guards = init_logging(&self.config.logging).map_err(|e| {
            ServerError::InitializationError(format!("Failed to initialize logging: {e}"))
        })?;

        self._log_guards = guards;
        info!(level = %self.config.logging.level, "Logging initialized");
        Ok(())
    }

    fn init_metrics(&self) {
        if let Err(e) = init_metrics(&self.config.metrics) {
            warn!(error = %e, "Metrics initialization failed");
        } else if self.config.metrics.enabled {
            info!("Metrics initialized");
        }
    }

    fn seed(&self) -> Result<(), ServerError> {
        if self.config.bootstrap.is_empty() {
            return Ok(());
        }
        self.config.bootstrap.seed(
            &self.stores.accounts,
            &self.stores.tenants,
            &self.stores.identities,
        )?;
        Ok(())
    }

    /// Serves until a shutdown signal, then drains for at most the
    /// configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the server was not initialized or fails to serve.
    pub async fn run(&self) -> Result<(), ServerError> {
        self.transition(ServerState::Starting, ServerState::Running)
            .await?;

        let api_server = ApiServer::new(self.config.api.clone(), self.stores.services());

        let signals = self.shutdown.clone();
        tokio::spawn(async move {
            setup_signal_handlers(signals).await;
        });

        let shutdown = self.shutdown.clone();
        let serve = api_server.run_with_shutdown(async move {
            shutdown.wait_for_shutdown().await;
        });
        tokio::pin!(serve);

        let timeout = self.config.shutdown.timeout();
        let drain_deadline = async {
            self.shutdown.wait_for_shutdown().await;
            tokio::time::sleep(timeout).await;
        };

        tokio::select! {
            result = &mut serve => {
                result.map_err(|e| ServerError::RuntimeError(e.to_string()))?;
            }
            () = drain_deadline => {
                warn!(?timeout, "In-flight requests did not drain in time");
            }
        }

        self.finish_shutdown().await;
        Ok(())
    }

    async fn finish_shutdown(&self) {
        *self.state.write().await = ServerState::Stopped;
        self.shutdown.mark_complete();
        info!("Atrium server stopped");
    }

    /// Initiates shutdown.
    pub fn shutdown(&self) {
        self.shutdown.initiate_shutdown();
    }

    async fn transition(&self, from: ServerState, to: ServerState) -> Result<(), ServerError> {
        let mut state = self.state.write().await;
        if *state != from {
            return Err(ServerError::InvalidState(format!(
                "Expected {from:?} to move to {to:?}, found {:?}",
                *state
            )));
        }
        *state = to;
        Ok(())
    }
}

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A store rejected its setup or seed data
    #[error("Store error: {0}")]
    Store(#[from] SecurityError),

    /// Telemetry could not start
    #[error("Initialization error: {0}")]
    InitializationError(String),

    /// Lifecycle method called out of order
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Serving failed
    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_security::session::SessionConfig;

    fn config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.api.session = SessionConfig::with_secret("0123456789abcdef0123456789abcdef");
        config
    }

    #[tokio::test]
    async fn test_server_new() {
        let server = AtriumServer::new(config()).unwrap();
        assert_eq!(server.state().await, ServerState::Stopped);
    }

    #[test]
    fn test_missing_secret_is_a_store_error() {
        let err = AtriumServer::new(ServerConfig::default()).err().unwrap();
        assert!(matches!(err, ServerError::Store(_)));
    }

    #[tokio::test]
    async fn test_cannot_run_before_initialize() {
        let server = AtriumServer::new(config()).unwrap();

        let result = server.run().await;
        assert!(matches!(result, Err(ServerError::InvalidState(_))));
        assert_eq!(server.state().await, ServerState::Stopped);
    }

    #[test]
    fn test_seed_populates_stores() {
        let mut config = config();
        config.bootstrap = serde_json::from_value(serde_json::json!({
            "tenants": [{ "slug": "acme", "name": "Acme Salon" }]
        }))
        .unwrap();
        let server = AtriumServer::new(config).unwrap();

        server.seed().unwrap();
        assert_eq!(server.stores.tenants.len(), 1);
    }

    #[test]
    fn test_missing_config_file() {
        let err = AtriumServer::load_config("/nonexistent/atrium.yaml").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn test_server_error_display() {
        let err = ServerError::InvalidState("test".to_string());
        assert_eq!(err.to_string(), "Invalid state: test");
    }
}
