mod api;
mod config;
mod db;
mod models;

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// HTTP backend for client records, anamnesis forms and photos
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Create missing tables before serving (same as INIT_SCHEMA=true)
    #[arg(long)]
    init_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::init()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    config.init_schema |= cli.init_schema;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("client_records=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize database connection
    let db = db::init(&config).await?;
    tracing::info!(init_schema = config.init_schema, "database connection established");

    let app = api::router(db);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "client records service listening");

    axum::serve(listener, app).await?;

    Ok(())
}
