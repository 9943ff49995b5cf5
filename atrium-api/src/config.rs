//! API configuration types.
//!
//! This module provides configuration for the API server including:
//! - Server binding address and port
//! - Session cookie settings
//! - Route matcher exclusions
//! - CORS settings

use atrium_core::config::{
    Configurable, EnvOverride, Validatable, ValidationResult, Validator,
};
use atrium_security::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Session cookie configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Route matcher configuration
    #[serde(default)]
    pub routing: RoutingConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Enable request logging
    #[serde(default = "default_true")]
    pub enable_request_logging: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session: SessionConfig::default(),
            routing: RoutingConfig::default(),
            cors: CorsConfig::default(),
            enable_request_logging: true,
        }
    }
}

impl ApiConfig {
    /// Returns the server bind address.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validatable for ApiConfig {
    fn validate(&self) -> ValidationResult {
        let mut validator = Validator::new("api");
        validator
            .require_non_empty("host", &self.host)
            .positive("port", &self.port);
        validator.result()?;

        self.session.validate()?;
        self.routing.validate()?;
        self.cors.validate()
    }
}

impl Configurable for ApiConfig {
    fn apply_env_overrides(&mut self, prefix: &str) {
        EnvOverride::apply_string(&format!("{prefix}_API_HOST"), &mut self.host);
        EnvOverride::apply_number(&format!("{prefix}_API_PORT"), &mut self.port);
        EnvOverride::apply_list(
            &format!("{prefix}_CORS_ALLOWED_ORIGINS"),
            &mut self.cors.allowed_origins,
        );
        self.session.apply_env_overrides(prefix);
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        let mut names = vec![
            format!("{prefix}_API_HOST"),
            format!("{prefix}_API_PORT"),
            format!("{prefix}_CORS_ALLOWED_ORIGINS"),
        ];
        names.extend(SessionConfig::env_var_names(prefix));
        names
    }
}

/// Route matcher configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Additional path prefixes that bypass the request router, e.g. webhook
    /// endpoints mounted by an embedding application.
    #[serde(default)]
    pub extra_excluded_prefixes: Vec<String>,
}

impl Validatable for RoutingConfig {
    fn validate(&self) -> ValidationResult {
        let mut validator = Validator::new("api.routing");
        for prefix in &self.extra_excluded_prefixes {
            validator.custom(
                "extra_excluded_prefixes",
                || prefix.starts_with('/') && prefix.len() > 1,
                "Prefixes must be absolute paths other than '/'",
            );
        }
        validator.result()
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Enable CORS
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Allowed origins (empty means all origins)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allowed methods
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed headers
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,

    /// Allow credentials. Requires explicit origins.
    #[serde(default)]
    pub allow_credentials: bool,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec![],
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            allow_credentials: false,
            max_age_secs: default_max_age(),
        }
    }
}

impl CorsConfig {
    /// Returns the preflight cache duration.
    #[must_use]
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }
}

impl Validatable for CorsConfig {
    fn validate(&self) -> ValidationResult {
        let mut validator = Validator::new("api.cors");
        if self.enabled && self.allow_credentials {
            validator.custom(
                "allowed_origins",
                || !self.allowed_origins.is_empty() && !self.allowed_origins.iter().any(|o| o == "*"),
                "Credentialed CORS requires explicit origins",
            );
        }
        for origin in &self.allowed_origins {
            validator.custom(
                "allowed_origins",
                || origin == "*" || origin.starts_with("http://") || origin.starts_with("https://"),
                "Origins must start with http:// or https://",
            );
        }
        validator.result()
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_methods() -> Vec<String> {
    vec![
        "GET".to_string(),
        "POST".to_string(),
        "PUT".to_string(),
        "PATCH".to_string(),
        "DELETE".to_string(),
        "OPTIONS".to_string(),
    ]
}

fn default_headers() -> Vec<String> {
    vec!["Content-Type".to_string(), "X-Request-Id".to_string()]
}

fn default_max_age() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ApiConfig {
        ApiConfig {
            session: SessionConfig::with_secret("0123456789abcdef0123456789abcdef"),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.session.cookie_name, "atrium_session");
        assert!(config.routing.extra_excluded_prefixes.is_empty());
        assert!(config.cors.enabled);
    }

    #[test]
    fn test_bind_address() {
        let config = ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_validate_requires_session_secret() {
        assert!(ApiConfig::default().validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let config = ApiConfig {
            port: 0,
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.port"));
    }

    #[test]
    fn test_credentialed_cors_needs_origins() {
        let mut config = valid_config();
        config.cors.allow_credentials = true;
        assert!(config.validate().is_err());

        config.cors.allowed_origins = vec!["https://console.atrium.test".to_string()];
        assert!(config.validate().is_ok());

        config.cors.allowed_origins = vec!["console.atrium.test".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_routing_prefixes_must_be_absolute() {
        let mut config = valid_config();
        config.routing.extra_excluded_prefixes = vec!["webhooks".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = r"
port: 9000
session:
  secret: 0123456789abcdef0123456789abcdef
  ttl_secs: 3600
routing:
  extra_excluded_prefixes: [/webhooks]
";
        let config: ApiConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.session.ttl_secs, 3600);
        assert_eq!(config.routing.extra_excluded_prefixes, vec!["/webhooks"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_names() {
        let names = ApiConfig::env_var_names("ATRIUM");
        assert!(names.contains(&"ATRIUM_API_PORT".to_string()));
        assert!(names.contains(&"ATRIUM_SESSION_SECRET".to_string()));
    }
}
