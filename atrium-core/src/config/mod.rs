//! Configuration management module.
//!
//! This module provides a flexible configuration system supporting:
//! - YAML, TOML and JSON configuration file formats
//! - Configuration validation with descriptive error messages
//! - Environment variable overrides for deployment-specific settings
//!
//! # Example
//!
//! ```rust,ignore
//! use atrium_core::config::{ConfigLoader, ConfigFormat};
//!
//! // Load from YAML file, apply ATRIUM_* overrides, validate
//! let config: ServerConfig = ConfigLoader::new()
//!     .with_env_prefix("ATRIUM")
//!     .load("atrium.yaml")?;
//!
//! // Parse a TOML string only
//! let config: ServerConfig = ConfigLoader::new()
//!     .load_str(toml_content, ConfigFormat::Toml)?;
//! ```

mod loader;
mod traits;
pub mod validation;

pub use loader::{ConfigFormat, ConfigLoader};
pub use traits::{Configurable, Validatable};
pub use validation::{EnvOverride, ValidationResult, Validator};
