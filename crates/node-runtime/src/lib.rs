//! # Node Runtime
//!
//! Wires the chain-state core together and drives its background tasks.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration and the subsystem container
//! - `genesis/` - Genesis block creation
//! - `adapters/` - Port implementations shared by the subsystems
//!
//! ## Flow
//!
//! ```text
//! Network / Production ──→ Block Import (1) ──→ InMemoryChain
//!                                 │                  │
//!                                 │ handle_digests   ├── imported ──┐
//!                                 ↓                  └── finalised ─┤
//!                          Digest Handler (2) ←──────────────────────┘
//!
//! Peer BlockRequest ──→ Chain Sync (3) ──→ InMemoryChain
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then environment)
//! 2. Build genesis and the in-memory chain
//! 3. Initialize subsystems in dependency order
//! 4. Spawn the digest notification loops and the import intake loop
//! 5. Run until the shutdown signal

pub mod adapters;
pub mod container;
pub mod genesis;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub use crate::container::{ConfigError, NodeConfig, SubsystemContainer};
use crate::genesis::GenesisConfig;

/// How long shutdown waits for background tasks.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The node runtime owning all subsystems and their tasks.
pub struct NodeRuntime {
    container: Arc<SubsystemContainer>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Result<Self> {
        Self::with_genesis(config, GenesisConfig::default())
    }

    pub fn with_genesis(config: NodeConfig, genesis: GenesisConfig) -> Result<Self> {
        info!("Creating node runtime");
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let container = Arc::new(SubsystemContainer::with_genesis(config, genesis, shutdown_rx)?);
        Ok(Self {
            container,
            shutdown_tx,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Spawn the background loops. Must run inside a tokio runtime.
    pub fn start(&self) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            warn!("Node runtime already started");
            return;
        }

        tasks.extend(self.container.digest_handler.start());
        match self.container.block_import.start() {
            Some(handle) => tasks.push(handle),
            None => warn!("[qc-01] Intake loop was already started"),
        }

        info!(
            tasks = tasks.len(),
            best = self.container.chain.best_number(),
            "All subsystems running"
        );
    }

    /// Signal shutdown and wait for the background loops to exit.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks: Vec<JoinHandle<()>> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Background task failed: {}", e),
                Err(_) => warn!("Background task did not stop within {:?}", SHUTDOWN_GRACE),
            }
        }
        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }
}
