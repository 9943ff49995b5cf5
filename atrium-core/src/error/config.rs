//! Configuration errors.

use thiserror::Error;

/// Why a configuration could not be loaded or was rejected.
///
/// Validation reports fields as dotted paths, e.g. `api.session.secret`.
///
/// ```
/// use atrium_core::error::ConfigError;
///
/// let error = ConfigError::missing_field_in_section("secret", "api.session");
/// assert_eq!(
///     error.to_string(),
///     "[Config] Missing field 'secret' in section 'api.session'"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value is absent or blank.
    #[error("[Config] Missing field '{field}'{}", section.as_ref().map(|s| format!(" in section '{s}'")).unwrap_or_default())]
    MissingField {
        /// Field name.
        field: String,
        /// Dotted section path, when known.
        section: Option<String>,
    },

    /// A value is present but unusable.
    #[error("[Config] Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field path.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The file could not be read.
    #[error("[Config] Failed to read file '{path}': {reason}")]
    FileReadError {
        /// File path.
        path: String,
        /// I/O error text.
        reason: String,
    },

    /// The content is not valid YAML, TOML or JSON, or does not fit the
    /// expected shape.
    #[error("[Config] Invalid format in '{path}': {reason}")]
    InvalidFormat {
        /// File path, or `<string>` for in-memory content.
        path: String,
        /// Parser error text.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            section: None,
        }
    }

    /// Creates a missing field error with section.
    #[must_use]
    pub fn missing_field_in_section(field: impl Into<String>, section: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            section: Some(section.into()),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a read error for `path`.
    #[must_use]
    pub fn file_read(path: impl Into<String>, err: &std::io::Error) -> Self {
        Self::FileReadError {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Creates a format error for `path`.
    #[must_use]
    pub fn invalid_format(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field() {
        let error = ConfigError::missing_field("secret");
        assert_eq!(error.to_string(), "[Config] Missing field 'secret'");
    }

    #[test]
    fn test_invalid_value_names_the_field_path() {
        let error = ConfigError::invalid_value("api.session.ttl_secs", "Must be positive");
        assert!(matches!(error, ConfigError::InvalidValue { .. }));
        assert!(error.to_string().contains("api.session.ttl_secs"));
    }

    #[test]
    fn test_file_read_keeps_io_reason() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error = ConfigError::file_read("config/atrium.yaml", &io);
        assert_eq!(
            error.to_string(),
            "[Config] Failed to read file 'config/atrium.yaml': no such file"
        );
    }
}
