//! Configuration file loading.
//!
//! Files are parsed by extension, then `<PREFIX>_*` environment variables are
//! applied and the result is validated.

use super::traits::{Configurable, Validatable};
use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

const IN_MEMORY: &str = "<string>";

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// `.yaml`, `.yml`
    #[default]
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Detects the format from a file extension, ignoring case.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn parse<T: DeserializeOwned>(self, content: &str, origin: &str) -> Result<T, ConfigError> {
        let parsed = match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| format!("YAML: {e}")),
            Self::Toml => toml::from_str(content).map_err(|e| format!("TOML: {e}")),
            Self::Json => serde_json::from_str(content).map_err(|e| format!("JSON: {e}")),
        };
        parsed.map_err(|reason| ConfigError::invalid_format(origin, reason))
    }
}

/// Loads configuration files.
///
/// ```rust,ignore
/// use atrium_core::config::ConfigLoader;
///
/// let config: ServerConfig = ConfigLoader::new()
///     .with_env_prefix("ATRIUM")
///     .load("config/atrium.yaml")?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader without environment overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `<PREFIX>_*` environment variables in [`ConfigLoader::load`]
    /// and [`ConfigLoader::finish`].
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Parses a file, applies environment overrides and validates.
    pub fn load<T, P>(&self, path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned + Configurable + Validatable,
        P: AsRef<Path>,
    {
        let config = self.load_file(path)?;
        self.finish(config)
    }

    /// Applies environment overrides and validation to a configuration that
    /// did not come from a file, e.g. one built from defaults.
    pub fn finish<T>(&self, mut config: T) -> Result<T, ConfigError>
    where
        T: Configurable + Validatable,
    {
        if let Some(prefix) = &self.env_prefix {
            config.apply_env_overrides(prefix);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parses a file without overrides or validation.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidFormat`] for unknown extensions and parse
    /// failures, [`ConfigError::FileReadError`] when the file cannot be read.
    pub fn load_file<T, P>(&self, path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            ConfigError::invalid_format(
                &origin,
                "Unrecognized file extension. Supported: .yaml, .yml, .toml, .json",
            )
        })?;

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::file_read(&origin, &e))?;

        format.parse(&content, &origin)
    }

    /// Parses in-memory content.
    pub fn load_str<T>(&self, content: &str, format: ConfigFormat) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        format.parse(content, IN_MEMORY)
    }
}
