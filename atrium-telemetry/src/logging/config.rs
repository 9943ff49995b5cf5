//! Logging configuration types.

use serde::{Deserialize, Serialize};

/// Logging settings of an Atrium process.
///
/// ```yaml
/// level: info,atrium_api=debug
/// format: json
/// file:
///   directory: logs
///   rotation: daily
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG` when set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Format of the stdout stream.
    #[serde(default)]
    pub format: LogFormat,

    /// Write to stdout.
    #[serde(default = "default_stdout")]
    pub stdout: bool,

    /// Rolling JSON file next to stdout.
    #[serde(default)]
    pub file: Option<FileLogConfig>,

    /// Emit span open and close events, useful to time routing decisions.
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            stdout: default_stdout(),
            file: None,
            span_events: false,
        }
    }
}

impl LogConfig {
    /// Returns true if at least one sink is enabled.
    #[must_use]
    pub const fn has_sink(&self) -> bool {
        self.stdout || self.file.is_some()
    }
}

fn default_level() -> String {
    "info".to_string()
}

const fn default_stdout() -> bool {
    true
}

/// Stdout format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Multi-line human readable output
    Pretty,
}

/// Rolling log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLogConfig {
    /// Directory, created on startup.
    pub directory: String,

    /// File name prefix; rotation appends the date.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Rollover period.
    #[serde(default)]
    pub rotation: Rotation,
}

fn default_file_name() -> String {
    "atrium.log".to_string()
}

/// How often the log file rolls over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// New file every hour
    Hourly,
    /// New file every day
    #[default]
    Daily,
    /// Single file
    Never,
}
