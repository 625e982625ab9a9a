use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use htmx_demo_server::devserver::dev_router;
use htmx_demo_server::lifecycle::signals;

#[derive(Parser)]
#[command(name = "dev-server")]
#[command(about = "Serve the generated site and forward /api/* to the companion server", long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Directory holding the generated site.
    #[arg(short, long, default_value = "_site")]
    site_dir: PathBuf,

    /// Base URL of the companion server.
    #[arg(long, default_value = "http://localhost:3001")]
    backend: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "htmx_demo_server=debug,dev_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let app = dev_router(&cli.site_dir, &cli.backend);

    let listener = TcpListener::bind(&cli.bind).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        site_dir = %cli.site_dir.display(),
        backend = %cli.backend,
        "Dev server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(signals::terminate_signal())
        .await?;

    Ok(())
}
