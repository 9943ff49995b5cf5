//! # Atrium Core
//!
//! Core types and configuration plumbing shared by every Atrium crate.
//!
//! This crate provides:
//! - `NewType` identifiers for accounts and tenants (`AccountId`, `TenantId`)
//! - Validated tenant slugs (`TenantSlug`) and the tenant lifecycle status
//! - Configuration error types
//! - Configuration loading with YAML/TOML/JSON support and environment overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]

/// Identifier and tenant value types
pub mod types;

/// Error types
pub mod error;

/// Configuration management
pub mod config;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::error::*;
    pub use crate::types::*;
}
