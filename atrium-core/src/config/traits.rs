//! Configuration traits for validation and environment overrides.

use crate::error::ConfigError;

/// Trait for types that can be validated.
///
/// # Example
///
/// ```rust
/// use atrium_core::config::Validatable;
/// use atrium_core::error::ConfigError;
///
/// struct ListenConfig {
///     port: u16,
/// }
///
/// impl Validatable for ListenConfig {
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.port == 0 {
///             return Err(ConfigError::invalid_value("port", "Port cannot be 0"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(ListenConfig { port: 0 }.validate().is_err());
/// ```
pub trait Validatable {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Trait for types that support environment variable overrides.
pub trait Configurable: Sized {
    /// Applies environment variable overrides to the configuration.
    ///
    /// `prefix` is the deployment prefix, e.g. `ATRIUM`.
    fn apply_env_overrides(&mut self, prefix: &str);

    /// Returns the environment variable names that can override this configuration.
    fn env_var_names(prefix: &str) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestConfig {
        ttl_secs: i64,
    }

    impl Validatable for TestConfig {
        fn validate(&self) -> Result<(), ConfigError> {
            if self.ttl_secs <= 0 {
                return Err(ConfigError::invalid_value(
                    "ttl_secs",
                    "Value must be positive",
                ));
            }
            Ok(())
        }
    }

    #[test]
    fn test_validatable_success() {
        assert!(TestConfig { ttl_secs: 10 }.validate().is_ok());
    }

    #[test]
    fn test_validatable_failure() {
        let err = TestConfig { ttl_secs: 0 }.validate().unwrap_err();
        assert!(err.to_string().contains("ttl_secs"));
    }
}
