//! Structured logging system for Atrium.
//!
//! Provides configurable logging with support for:
//! - JSON and pretty-print formats
//! - Stdout plus an optional rolling JSON file
//! - `RUST_LOG` overrides of the configured level

mod config;

pub use config::{FileLogConfig, LogConfig, LogFormat, Rotation};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Initialize the logging system with the given configuration.
///
/// Returns guards that must be kept alive for the duration of the program
/// to ensure all file logs are flushed.
///
/// # Example
///
/// ```no_run
/// use atrium_telemetry::logging::{init_logging, LogConfig};
///
/// let config = LogConfig::default();
/// let _guards = init_logging(&config).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<Vec<WorkerGuard>, LoggingError> {
    if !config.has_sink() {
        return Err(LoggingError::InvalidConfig(
            "enable stdout or configure a log file".to_string(),
        ));
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| LoggingError::InvalidConfig(format!("invalid level filter: {e}")))?;

    let mut layers: Vec<BoxedLayer<_>> = Vec::new();
    let mut guards = Vec::new();

    if config.stdout {
        layers.push(stdout_layer(config));
    }
    if let Some(file) = &config.file {
        std::fs::create_dir_all(&file.directory)?;
        let (layer, guard) = file_layer(config, file);
        layers.push(layer);
        guards.push(guard);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(guards)
}

fn span_events(config: &LogConfig) -> FmtSpan {
    if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn stdout_layer<S>(config: &LogConfig) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer()
        .with_target(true)
        .with_span_events(span_events(config));

    match config.format {
        LogFormat::Json => layer.json().flatten_event(true).boxed(),
        LogFormat::Pretty => layer.pretty().boxed(),
    }
}

fn file_layer<S>(config: &LogConfig, file: &FileLogConfig) -> (BoxedLayer<S>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let directory = file.directory.as_str();
    let name = file.file_name.as_str();
    let appender = match file.rotation {
        Rotation::Hourly => tracing_appender::rolling::hourly(directory, name),
        Rotation::Daily => tracing_appender::rolling::daily(directory, name),
        Rotation::Never => tracing_appender::rolling::never(directory, name),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // Files are always JSON.
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(span_events(config))
        .json()
        .flatten_event(true)
        .boxed();

    (layer, guard)
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory: {0}")]
    DirectoryCreation(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid logging configuration: {0}")]
    InvalidConfig(String),

    /// A global subscriber is already installed
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
