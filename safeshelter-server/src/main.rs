//! HTTP server for the SafeShelter map.
//!
//! Serves the facility layers, nearest-facility lookups, routes and
//! geocoding from `safeshelter_core`, keeps in-memory incident reports, and
//! proxies the database tables and the chat API for the browser client.

mod chat;
mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(version, about = "SafeShelter map API server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind to
    #[arg(long)]
    bind: Option<std::net::IpAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("safeshelter_server=info,safeshelter_core=info,tower_http=info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    config.log();

    let state = AppState::from_config(&config)?;
    if state.source.is_some() {
        match state.reload().await {
            Ok(summary) if !summary.failed.is_empty() => {
                tracing::warn!(failed = ?summary.failed, "Some marker layers failed to load");
            }
            Ok(_) => {}
            Err(e) => tracing::error!("Initial marker load failed: {e}"),
        }
    }

    let app = routes::router(state, &config.server);
    let addr = SocketAddr::new(config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
