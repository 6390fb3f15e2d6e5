//! NWS forecast API (v1)
//!
//! Serves the forecast zone catalog and per-zone forecasts from api.weather.gov.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────────┐
//!                       │                    FORECAST API                      │
//!                       │                                                      │
//!   GET /zones          │  ┌────────┐   ┌────────────┐   ┌─────────────┐      │
//!   ────────────────────┼─▶│  http  │──▶│   output   │──▶│ ZoneCatalog │──────┼──▶ zones.json
//!                       │  │ server │   │   cache    │   │ (1h cache)  │      │
//!   GET /forecast/{id}  │  └────────┘   └─────┬──────┘   └─────────────┘      │
//!   ────────────────────┼─────────────────────┘          ┌─────────────┐      │
//!                       │                     └─────────▶│  Forecast   │      │
//!                       │                                │  Fetcher    │──────┼──▶ api.weather.gov
//!                       │                                └──────┬──────┘      │
//!                       │  ┌───────────────────────────────────┴───────────┐ │
//!                       │  │ diagnostics · spans · logging · /metrics      │ │
//!                       │  └───────────────────────────────────────────────┘ │
//!                       └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use forecast_api::config::load_or_default;
use forecast_api::lifecycle::{signals, Shutdown};
use forecast_api::observability::{logging, metrics};
use forecast_api::HttpServer;

#[derive(Parser)]
#[command(name = "forecast-api")]
#[command(about = "Zone catalog and forecast API backed by api.weather.gov", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "FORECAST_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!("forecast-api v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        zones_path = %config.catalog.zones_path,
        faults_enabled = config.faults.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
