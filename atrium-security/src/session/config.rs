//! Session cookie configuration.

use super::cookie::SameSite;
use atrium_core::config::{EnvOverride, ValidationResult, Validatable, Validator};
use atrium_telemetry::masking::Sensitive;
use serde::{Deserialize, Serialize};

/// Minimum length of the signing secret in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Configuration for signed session cookies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// HMAC signing secret.
    #[serde(default)]
    pub secret: Sensitive<String>,

    /// Token issuer claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,

    /// Lifetime of one token in seconds; sliding refresh extends it.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Minimum age of a token before the router reissues it.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Absolute lifetime of a session from sign-in, in seconds.
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,

    /// Whether cookies carry the `Secure` attribute.
    #[serde(default = "default_true")]
    pub secure_cookies: bool,

    /// `SameSite` attribute of the cookie.
    #[serde(default)]
    pub same_site: SameSite,
}

fn default_cookie_name() -> String {
    "atrium_session".to_string()
}

fn default_issuer() -> String {
    "atrium".to_string()
}

fn default_ttl_secs() -> u64 {
    8 * 3600
}

fn default_refresh_interval_secs() -> u64 {
    5 * 60
}

fn default_max_lifetime_secs() -> u64 {
    30 * 24 * 3600
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            secret: Sensitive::default(),
            issuer: default_issuer(),
            ttl_secs: default_ttl_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
            max_lifetime_secs: default_max_lifetime_secs(),
            secure_cookies: true,
            same_site: SameSite::default(),
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with the given secret and default timings.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: Sensitive::new(secret.into()),
            ..Self::default()
        }
    }

    /// Applies `<PREFIX>_SESSION_*` environment overrides.
    pub fn apply_env_overrides(&mut self, prefix: &str) {
        let mut secret = self.secret.expose().clone();
        EnvOverride::apply_string(&format!("{prefix}_SESSION_SECRET"), &mut secret);
        self.secret = Sensitive::new(secret);
        EnvOverride::apply_string(
            &format!("{prefix}_SESSION_COOKIE_NAME"),
            &mut self.cookie_name,
        );
        EnvOverride::apply_number(&format!("{prefix}_SESSION_TTL_SECS"), &mut self.ttl_secs);
        EnvOverride::apply_bool(
            &format!("{prefix}_SESSION_SECURE_COOKIES"),
            &mut self.secure_cookies,
        );
    }

    /// Environment variables read by [`SessionConfig::apply_env_overrides`].
    #[must_use]
    pub fn env_var_names(prefix: &str) -> Vec<String> {
        ["SECRET", "COOKIE_NAME", "TTL_SECS", "SECURE_COOKIES"]
            .iter()
            .map(|name| format!("{prefix}_SESSION_{name}"))
            .collect()
    }
}

impl Validatable for SessionConfig {
    fn validate(&self) -> ValidationResult {
        let mut validator = Validator::new("session");
        validator
            .require_non_empty("cookie_name", &self.cookie_name)
            .custom(
                "cookie_name",
                || {
                    self.cookie_name
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                },
                "cookie name may only contain ASCII letters, digits, '_' and '-'",
            )
            .custom(
                "secret",
                || self.secret.expose().len() >= MIN_SECRET_LEN,
                "signing secret must be at least 32 bytes",
            )
            .positive("ttl_secs", &self.ttl_secs)
            .custom(
                "refresh_interval_secs",
                || self.refresh_interval_secs < self.ttl_secs,
                "refresh interval must be shorter than the token lifetime",
            )
            .custom(
                "max_lifetime_secs",
                || self.max_lifetime_secs >= self.ttl_secs,
                "absolute lifetime must not be shorter than the token lifetime",
            )
            .custom(
                "same_site",
                || self.same_site != SameSite::None || self.secure_cookies,
                "SameSite=None requires secure cookies",
            );
        validator.result()
    }
}
