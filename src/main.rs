//! Maintenance gate server.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ SetMaintenance ─▶ AllowByIP ─▶ ResponseIfMaintenanceMode ─▶ app
//!                           │               │                  │
//!                           ▼               ▼                  └──▶ 503 + message
//!                     StorageClient (key_value | list)
//!                           ▲
//!     Operator ─▶ /admin/maintenance/* ─┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use maintenance_gate::config::{load_config, GateConfig};
use maintenance_gate::observability::{logging, metrics};
use maintenance_gate::{build_client, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "maintenance-gate")]
#[command(about = "HTTP server gated by a store-driven maintenance mode", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("maintenance-gate v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = ?config.storage.backend,
        store_address = %config.storage.address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = build_client(config.storage.backend);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, client);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
