//! # Atrium Telemetry
//!
//! Logging, tracing, and metrics for the Atrium control plane.
//!
//! This crate provides:
//! - Structured logging with JSON and pretty formats
//! - Log rotation and file management
//! - Masking of session tokens, cookies and passwords
//! - Spans for request routing and authorization
//! - Prometheus metrics export
//!
//! ## Features
//!
//! - **Structured Logging**: Uses `tracing` for structured, contextual logging
//! - **Multiple Outputs**: Supports stdout and rolling file targets
//! - **Data Masking**: `Sensitive<T>` and `SensitiveDataMasker` keep credentials out of logs
//! - **Metrics**: Prometheus-compatible routing and session metrics

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Logging configuration and initialization
pub mod logging;

/// Sensitive data masking
pub mod masking;

/// Span definitions for request tracing
pub mod spans;

/// Metrics collection and export
pub mod metrics;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::logging::{LogConfig, LogFormat, init_logging};
    pub use crate::masking::{Sensitive, SensitiveDataMasker};
    pub use crate::metrics::{AtriumMetrics, MetricsConfig, init_metrics};
    pub use crate::spans::*;
}
