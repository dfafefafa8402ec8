//! Blob Repository - minimal Maven-layout artifact server

use blobrepo_server::{run_server_with_shutdown, ServerConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "blobrepo")]
#[command(about = "Minimal Maven-layout artifact repository server")]
#[command(version)]
struct Args {
    /// Path to the YAML configuration file (created with defaults if missing)
    #[arg(short, long, default_value = "config.yml", env = "BLOBREPO_CONFIG")]
    config: PathBuf,

    /// Host to bind to (overrides the config file)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory artifacts are stored under
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Use in-memory storage (for testing, data will not persist)
    #[arg(long)]
    memory_store: bool,

    /// Enable debug logging
    #[arg(short, long, env = "BLOBREPO_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Setup logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("blobrepo_server={},blobrepo_core={},tower_http={}", log_level, log_level, log_level).into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ServerConfig::load(&args.config)?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }
    if args.memory_store {
        config.memory_store = true;
    }

    tracing::info!(
        "Starting blob repository on {} (config: {})",
        config.bind_addr(),
        args.config.display()
    );

    run_server_with_shutdown(config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
    })
    .await
}
