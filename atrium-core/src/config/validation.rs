//! Configuration validation utilities.
//!
//! This module provides utilities for validating configuration values
//! with descriptive error messages.

use crate::error::ConfigError;

/// Result type for validation operations.
pub type ValidationResult = Result<(), ConfigError>;

/// Fluent validator that collects errors under a section path.
///
/// # Example
///
/// ```rust
/// use atrium_core::config::Validator;
///
/// let mut validator = Validator::new("session");
/// validator
///     .require_non_empty("cookie_name", "atrium_session")
///     .positive("ttl_secs", &0_i64);
/// assert!(validator.result().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    section: String,
    errors: Vec<ConfigError>,
}

impl Validator {
    /// Creates a validator for the given configuration section.
    #[must_use]
    pub fn new(section: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            errors: Vec::new(),
        }
    }

    fn field_path(&self, field: &str) -> String {
        if self.section.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.section)
        }
    }

    fn invalid(&mut self, field: &str, reason: impl Into<String>) {
        let error = ConfigError::invalid_value(self.field_path(field), reason);
        self.errors.push(error);
    }

    /// Validates that a string field is not empty.
    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            let error = if self.section.is_empty() {
                ConfigError::missing_field(field)
            } else {
                ConfigError::missing_field_in_section(field, self.section.clone())
            };
            self.errors.push(error);
        }
        self
    }

    /// Validates that a numeric value is within an inclusive range.
    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        &mut self,
        field: &str,
        value: &T,
        min: &T,
        max: &T,
    ) -> &mut Self {
        if value < min || value > max {
            self.invalid(field, format!("Value {value} must be between {min} and {max}"));
        }
        self
    }

    /// Validates that a numeric value is positive.
    pub fn positive<T: PartialOrd + Default + std::fmt::Display>(
        &mut self,
        field: &str,
        value: &T,
    ) -> &mut Self {
        if *value <= T::default() {
            self.invalid(field, format!("Value {value} must be positive"));
        }
        self
    }

    /// Validates using a custom predicate.
    pub fn custom<F>(&mut self, field: &str, predicate: F, error_msg: &str) -> &mut Self
    where
        F: FnOnce() -> bool,
    {
        if !predicate() {
            self.invalid(field, error_msg);
        }
        self
    }

    /// Returns the collected errors.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Returns the first collected error, if any.
    pub fn result(&self) -> ValidationResult {
        self.errors.first().cloned().map_or(Ok(()), Err)
    }
}

/// Environment variable helper for applying overrides.
///
/// Unparseable values are ignored so a typo in the environment falls back
/// to the file value.
pub struct EnvOverride;

impl EnvOverride {
    /// Applies an environment variable override to a string value.
    pub fn apply_string(var_name: &str, target: &mut String) {
        if let Ok(value) = std::env::var(var_name) {
            *target = value;
        }
    }

    /// Applies an environment variable override to a numeric value.
    pub fn apply_number<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(value) = std::env::var(var_name)
            && let Ok(parsed) = value.parse()
        {
            *target = parsed;
        }
    }

    /// Applies an environment variable override to a boolean value.
    pub fn apply_bool(var_name: &str, target: &mut bool) {
        if let Ok(value) = std::env::var(var_name) {
            match value.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => *target = true,
                "false" | "0" | "no" | "off" => *target = false,
                _ => {}
            }
        }
    }

    /// Applies an environment variable override to a comma-separated list.
    pub fn apply_list(var_name: &str, target: &mut Vec<String>) {
        if let Ok(value) = std::env::var(var_name) {
            *target = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validator_collects_errors_with_section() {
        let mut validator = Validator::new("session");
        validator
            .require_non_empty("cookie_name", "")
            .positive("ttl_secs", &-5_i64)
            .in_range("port", &8080_u32, &1, &65535);

        assert_eq!(validator.errors().len(), 2);
        let err = validator.result().unwrap_err();
        assert!(err.to_string().contains("cookie_name"));
        assert!(err.to_string().contains("session"));
        assert!(
            validator.errors()[1]
                .to_string()
                .contains("session.ttl_secs")
        );
    }

    #[test]
    fn test_validator_custom() {
        let mut validator = Validator::new("");
        validator.custom("path", || "/login".starts_with('/'), "must be absolute");
        assert!(validator.result().is_ok());

        validator.custom("path", || "login".starts_with('/'), "must be absolute");
        let err = validator.result().unwrap_err();
        assert!(err.to_string().contains("must be absolute"));
    }

    #[test]
    fn test_env_override_missing_var_keeps_value() {
        let mut value = false;
        EnvOverride::apply_bool("ATRIUM_NONEXISTENT_VAR_12345", &mut value);
        assert!(!value);

        let mut list = vec!["a".to_string()];
        EnvOverride::apply_list("ATRIUM_NONEXISTENT_VAR_12345", &mut list);
        assert_eq!(list, vec!["a".to_string()]);
    }
}
