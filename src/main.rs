//! HTMX demo companion server.
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!   Browser ─────────▶│  CORS · request ID · trace                    │
//!                     │     │                                          │
//!                     │     ├─ /api/bad-apple/* ─▶ gate ─▶ passthrough ─┼──▶ SSE upstream
//!                     │     ├─ /api/*           ─▶ demo fragments      │
//!                     │     ├─ /health                                 │
//!                     │     └─ everything else  ─▶ _site/              │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use htmx_demo_server::config::{self, ServerConfig, PORT_ENV};
use htmx_demo_server::observability::{logging, metrics};
use htmx_demo_server::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "htmx-demo-server")]
#[command(about = "Companion server for the HTMX demo site", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    let config = config::apply_env_overrides(config, std::env::var(PORT_ENV).ok())?;

    logging::init_logging(&config.observability);
    tracing::info!("htmx-demo-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.gate.upstream,
        max_connections = config.gate.max_connections,
        site_dir = %config.site.dir,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
