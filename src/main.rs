#![forbid(unsafe_code)]

//! `exec-relay` — subprocess relay server binary.
//!
//! Bootstraps configuration, builds the backend registry, and runs the
//! TCP listener until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use exec_relay::config::GlobalConfig;
use exec_relay::registry::BackendRegistry;
use exec_relay::server::Server;
use exec_relay::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "exec-relay", about = "Line-oriented subprocess relay server", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format);
    info!("exec-relay server bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = GlobalConfig::load_from_path(&args.config)?;

    // Override the bind address from the CLI if provided.
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    let registry = Arc::new(BackendRegistry::from_config(&config)?);
    info!(backends = registry.len(), "configuration loaded");

    let server = Server::bind(Arc::new(config), registry).await?;

    let cancel = CancellationToken::new();
    let ct = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("interrupt received, shutting down"),
            Err(err) => warn!(%err, "failed to listen for interrupt"),
        }
        ct.cancel();
    });

    server.run(cancel).await;
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Text => fmt().with_env_filter(filter).init(),
        LogFormat::Json => fmt().json().with_env_filter(filter).init(),
    }
}
