//! # Atrium Server
//!
//! ```bash
//! # Run with the default configuration file
//! atrium-server
//!
//! # Run with a custom configuration file
//! atrium-server --config /etc/atrium/atrium.yaml
//!
//! # Override through the environment
//! ATRIUM_API_PORT=9090 ATRIUM_SESSION_SECRET=... atrium-server
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use atrium_core::config::{ConfigLoader, Configurable, Validatable};
use atrium_server::config::ENV_PREFIX;
use atrium_server::{AtriumServer, ServerConfig, ServerError};

/// Atrium control plane server
#[derive(Parser, Debug)]
#[command(name = "atrium-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/atrium.yaml")]
    config: PathBuf,

    /// Override bind host
    #[arg(long)]
    host: Option<String>,

    /// Override bind port
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).with_context(|| {
        format!("Failed to load configuration from {}", args.config.display())
    })?;

    if args.validate {
        println!("Configuration is valid");
        return Ok(());
    }

    if let Err(e) = run_server(config).await {
        error!(error = %e, "Server error");
        return Err(e).context("Atrium server failed");
    }
    info!("Atrium server exited");
    Ok(())
}

/// Loads the configuration file, or defaults when it is missing, then
/// applies environment overrides, then CLI overrides, and validates.
fn load_config(args: &Args) -> Result<ServerConfig, ServerError> {
    let mut config = if args.config.exists() {
        ConfigLoader::new().load_file(&args.config)?
    } else {
        eprintln!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
        ServerConfig::default()
    };
    config.apply_env_overrides(ENV_PREFIX);

    if let Some(host) = &args.host {
        config.api.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let mut server = AtriumServer::new(config)?;
    server.initialize().await?;
    server.run().await
}
