//! # Node Runtime Binary
//!
//! Loads configuration from the environment, installs logging and runs the
//! chain-state core until Ctrl+C.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use node_runtime::{NodeConfig, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("===========================================");
    info!("  Quantum-Chain Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let runtime = NodeRuntime::new(config)?;
    runtime.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
