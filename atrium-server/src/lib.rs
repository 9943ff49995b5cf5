//! # Atrium Server
//!
//! Process entry for the Atrium control plane.
//!
//! This crate provides:
//! - Configuration loading with `ATRIUM_*` environment overrides
//! - Telemetry (logging and metrics) initialization
//! - Bootstrap seeding of accounts, tenants, operators and members
//! - Graceful shutdown on SIGINT/SIGTERM

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod bootstrap;
pub mod config;
pub mod server;
pub mod shutdown;

pub use bootstrap::BootstrapConfig;
pub use config::ServerConfig;
pub use server::{AtriumServer, ServerError};
pub use shutdown::ShutdownController;
