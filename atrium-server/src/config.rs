//! Server configuration.
//!
//! One file holds every section; `ATRIUM_*` environment variables and CLI
//! flags override it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use atrium_api::ApiConfig;
use atrium_core::config::{Configurable, EnvOverride, ValidationResult, Validatable, Validator};
use atrium_telemetry::logging::LogConfig;
use atrium_telemetry::metrics::MetricsConfig;

use crate::bootstrap::BootstrapConfig;

/// Prefix of every environment override.
pub const ENV_PREFIX: &str = "ATRIUM";

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP layer: bind address, sessions, routing and CORS
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging
    #[serde(default)]
    pub logging: LogConfig,

    /// Metrics
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Shutdown behaviour
    #[serde(default)]
    pub shutdown: ShutdownConfig,

    /// Records seeded at startup
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl Configurable for ServerConfig {
    fn apply_env_overrides(&mut self, prefix: &str) {
        self.api.apply_env_overrides(prefix);
        EnvOverride::apply_string(&format!("{prefix}_LOG_LEVEL"), &mut self.logging.level);
        EnvOverride::apply_bool(
            &format!("{prefix}_METRICS_ENABLED"),
            &mut self.metrics.enabled,
        );
        EnvOverride::apply_number(
            &format!("{prefix}_SHUTDOWN_TIMEOUT"),
            &mut self.shutdown.timeout_secs,
        );
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        let mut names = ApiConfig::env_var_names(prefix);
        names.extend([
            format!("{prefix}_LOG_LEVEL"),
            format!("{prefix}_METRICS_ENABLED"),
            format!("{prefix}_SHUTDOWN_TIMEOUT"),
        ]);
        names
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ValidationResult {
        self.api.validate()?;
        Validator::new("logging")
            .require_non_empty("level", &self.logging.level)
            .custom("stdout", || self.logging.has_sink(), "No log sink enabled")
            .result()?;
        self.shutdown.validate()?;
        self.bootstrap.validate()
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// How long in-flight requests may take to drain, in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_shutdown_timeout_secs() -> u64 {
    30
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl ShutdownConfig {
    /// Returns the shutdown timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validatable for ShutdownConfig {
    fn validate(&self) -> ValidationResult {
        Validator::new("shutdown")
            .positive("timeout_secs", &self.timeout_secs)
            .result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_core::config::{ConfigFormat, ConfigLoader};

    const YAML: &str = r"
api:
  host: 127.0.0.1
  port: 3000
  session:
    secret: 0123456789abcdef0123456789abcdef
logging:
  level: debug
  format: pretty
shutdown:
  timeout_secs: 5
bootstrap:
  tenants:
    - slug: acme
      name: Acme Salon
";

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.shutdown.timeout(), Duration::from_secs(30));
        assert!(config.bootstrap.is_empty());
        // No session secret yet.
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_yaml() {
        let config: ServerConfig = ConfigLoader::new()
            .load_str(YAML, ConfigFormat::Yaml)
            .unwrap();

        assert_eq!(config.api.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.shutdown.timeout_secs, 5);
        assert_eq!(config.bootstrap.tenants.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_config_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/atrium.example.yaml");
        let config: ServerConfig = ConfigLoader::new().load_file(path).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.bootstrap.operators.len(), 1);
        assert_eq!(config.api.routing.extra_excluded_prefixes, vec!["/webhooks"]);
    }

    #[test]
    fn test_secret_not_in_debug_output() {
        let config: ServerConfig = ConfigLoader::new()
            .load_str(YAML, ConfigFormat::Yaml)
            .unwrap();
        assert!(!format!("{config:?}").contains("0123456789abcdef"));
    }

    #[test]
    fn test_logging_without_sink_is_invalid() {
        let mut config: ServerConfig = ConfigLoader::new()
            .load_str(YAML, ConfigFormat::Yaml)
            .unwrap();
        config.logging.stdout = false;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.stdout"));
    }

    #[test]
    fn test_zero_shutdown_timeout_is_invalid() {
        let config = ShutdownConfig { timeout_secs: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_var_names() {
        let names = ServerConfig::env_var_names(ENV_PREFIX);
        assert!(names.contains(&"ATRIUM_API_PORT".to_string()));
        assert!(names.contains(&"ATRIUM_LOG_LEVEL".to_string()));
        assert!(names.contains(&"ATRIUM_SHUTDOWN_TIMEOUT".to_string()));
    }
}
