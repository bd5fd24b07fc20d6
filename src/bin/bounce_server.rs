//! Bounce travel search HTTP server.

use bounce::{BounceConfig, SearchServer, build_aggregator};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Bounce: multi-provider hotel search aggregation service.
#[derive(Parser)]
#[command(name = "bounce-server", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the config file and `API_PORT`/`PORT`.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = BounceConfig::load(cli.config.as_deref())?;
    config.server.apply_port_env(|name| std::env::var(name).ok());
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    let aggregator = build_aggregator(&config)?;
    info!(providers = ?aggregator.provider_labels(), "providers registered");

    let server = SearchServer::start(aggregator, &config.server).await?;
    info!("bounce-server v{} ready on port {}", env!("CARGO_PKG_VERSION"), server.port());

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    server.shutdown();
    Ok(())
}
