//! Configuration admin service
//!
//! Edits the multiplier and operator tables of the hosted row store and
//! forwards rank notifications to a remote function.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────────────┐
//!                      │                    CONFIG ADMIN                        │
//!                      │                                                       │
//!   Admin Request      │  ┌─────────┐    ┌─────────┐    ┌───────────────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│  admin  │───▶│ service           │  │
//!                      │  │ server  │    │auth+hdlr│    │ reader / writer / │  │
//!                      │  └─────────┘    └────┬────┘    │ deleter / toggle  │  │
//!                      │                      │         └───┬──────────┬────┘  │
//!                      │                      │             │          │       │
//!                      │                      ▼             ▼          ▼       │
//!                      │               ┌───────────┐  ┌─────────┐ ┌─────────┐  │     Hosted
//!                      │               │  notify   │  │  cache  │ │  store  │──┼───▶ row store
//!                      │               │ forwarder │  │(per key)│ │rest/mem │  │
//!                      │               └─────┬─────┘  └─────────┘ └─────────┘  │
//!                      │                     │                                 │
//!                      └─────────────────────┼─────────────────────────────────┘
//!                                            └──────────────────────────────────▶ Remote function
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use config_admin::config::{load_config, loader::finalize_config, AdminServiceConfig};
use config_admin::observability::{logging, metrics};
use config_admin::{AdminServer, Shutdown};

#[derive(Parser)]
#[command(name = "config-admin")]
#[command(about = "Admin API for multiplier and operator configuration", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => finalize_config(AdminServiceConfig::default())?,
    };

    logging::init_logging(&config.observability);
    tracing::info!("config-admin v{} starting", env!("CARGO_PKG_VERSION"));

    if config.confine_placeholder_key() {
        tracing::warn!(
            bind_address = %config.listener.bind_address,
            "Admin key is the placeholder; listening on loopback only"
        );
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        store = ?config.store.backend,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let server = AdminServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
