//! Wanderlust web service

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use wanderlust::config::WanderlustConfig;
use wanderlust::{logging, web};

#[derive(Parser)]
#[command(name = "wanderlust")]
#[command(about = "Travel packages, AI trip planning and bookings over HTTP")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ~/.config/wanderlust/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Port to listen on, overrides the configuration
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = WanderlustConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    logging::init(&config.logging)?;
    info!(version = wanderlust::VERSION, "Starting Wanderlust");

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
            info!("Shutdown requested");
            shutdown.cancel();
        });
    }

    web::run(&config, shutdown).await
}
