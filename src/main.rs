use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use airmap::{AirMapConfig, AirQualityService, VERSION, WaqiClient, logging, web};

/// Air quality map backend for the WAQI sensor network
#[derive(Debug, Parser)]
#[command(name = "airmap", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to ./airmap.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AirMapConfig::load_from_path(cli.config)?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    logging::init(&config.logging)?;

    let region = config.region();
    tracing::info!(
        version = VERSION,
        latlng = %region.bounds.to_latlng_param(),
        keywords = ?region.keywords.iter().collect::<Vec<_>>(),
        "Serving air quality for region"
    );

    let client = WaqiClient::from_config(&config.upstream)
        .context("Failed to create WAQI client")?;
    let service = Arc::new(AirQualityService::new(Arc::new(client), region));

    let app = web::app(service, config.static_dir());
    web::run(app, &config.bind_address()).await
}
