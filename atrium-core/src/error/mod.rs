//! Error types shared across Atrium crates.
//!
//! Domain crates define their own error enums (`SecurityError`, `ApiError`);
//! this module only hosts the configuration errors every crate reports when
//! its settings are loaded and validated.

mod config;

pub use config::ConfigError;
pub use crate::types::SlugError;
