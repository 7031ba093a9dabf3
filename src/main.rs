//! Sailthru postback receiver.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │               POSTBACK RECEIVER               │
//!   POST               │  ┌─────────┐    ┌──────────┐    ┌──────────┐ │
//!   /sailthru_postback─┼─▶│  http   │───▶│ capture  │───▶│persist-  │─┼──▶ response_logs/
//!                      │  │ server  │    │ payload  │    │ ence     │ │    response_log_YYYY_MM_DD.txt
//!   200 + envelope     │  └────┬────┘    └──────────┘    └──────────┘ │
//!   ◀──────────────────┼───────┘                                      │
//!                      │  config · observability · lifecycle          │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use postback_receiver::config::{load_config, ReceiverConfig};
use postback_receiver::http::HttpServer;
use postback_receiver::lifecycle::{shutdown_signal, Shutdown};
use postback_receiver::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "postback-receiver")]
#[command(about = "Capture and log Sailthru postback requests", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ReceiverConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("postback-receiver v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoint = %config.endpoint.path,
        log_dir = %config.persistence.log_dir,
        persistence_enabled = config.persistence.enabled,
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
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config)?;

    let signal = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
