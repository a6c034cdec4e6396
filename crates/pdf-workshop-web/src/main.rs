//! PDF Workshop Web - HTTP server for editing stored PDF documents.

mod helpers;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use pdf_workshop_core::AppConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "pdf-workshop-web")]
#[command(author, version, about = "PDF Workshop Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Config file (defaults to ~/.config/pdf-workshop/config.toml or ./config.toml)
    #[arg(short, long, env = "PDF_WORKSHOP_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding stored documents
    #[arg(long, env = "PDF_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Ghostscript executable used for compression
    #[arg(long, env = "GS_BINARY")]
    gs_binary: Option<PathBuf>,

    /// Seconds before a compression run is killed (0 = no limit)
    #[arg(long)]
    compress_timeout: Option<u64>,

    /// Seconds a document may stay idle before it is deleted
    #[arg(long)]
    max_age: Option<u64>,

    /// Seconds between two expiry sweeps
    #[arg(long)]
    sweep_interval: Option<u64>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// Load the config file, then apply command-line overrides.
    fn config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => AppConfig::load(),
        };

        if let Some(dir) = &self.storage_dir {
            config.storage.dir.clone_from(dir);
        }
        if let Some(binary) = &self.gs_binary {
            config.compressor.binary.clone_from(binary);
        }
        if let Some(secs) = self.compress_timeout {
            config.compressor.timeout_secs = secs;
        }
        if let Some(secs) = self.max_age {
            config.retention.max_age_secs = secs;
        }
        if let Some(secs) = self.sweep_interval {
            config.retention.sweep_interval_secs = secs;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},lopdf=warn")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = args.config()?;

    // Create application state (creates the storage directory)
    let state = Arc::new(
        AppState::new(config).context("Failed to initialize application state")?,
    );
    info!(
        "Storing documents in {} (compressor: {})",
        state.workshop.store().dir().display(),
        state.workshop.compressor_name()
    );

    // Reclaim idle documents in the background for the lifetime of the server
    let sweeper = state.workshop.sweeper(&state.config.retention).spawn();
    info!(
        "Expiry sweep every {}s, deleting documents idle over {}s",
        state.config.retention.sweep_interval_secs, state.config.retention.max_age_secs
    );

    let app = routes::router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.stop().await.context("Failed to stop sweeper")?;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
