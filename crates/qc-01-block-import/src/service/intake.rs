//! Asynchronous block intake loop.

use std::sync::Arc;

use shared_types::short_hex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::BlockImportService;

impl BlockImportService {
    /// Spawn the intake loop. Returns `None` if it is already running.
    ///
    /// The loop drains blocks queued by the apply step, re-adds extrinsics
    /// from retracted branches and maintains the transaction pool. It stops
    /// when the queue closes or shutdown is signalled.
    pub fn start(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut receiver = self.intake_rx.lock().take()?;
        let mut shutdown = self.shutdown.clone();
        let service = Arc::clone(self);

        Some(tokio::spawn(async move {
            info!("[qc-01] Block intake loop started");
            loop {
                let prev = service.block_state.best_block_hash();
                tokio::select! {
                    _ = shutdown.changed() => {
                        info!("[qc-01] Block intake loop shutting down");
                        break;
                    }
                    maybe_block = receiver.recv() => {
                        let Some(block) = maybe_block else {
                            debug!("[qc-01] Intake queue closed");
                            break;
                        };
                        let hash = block.hash();
                        if let Err(e) = service.handle_chain_reorg(&prev, &hash) {
                            warn!(
                                block = %short_hex(&hash),
                                error = %e,
                                "[qc-01] Failed to re-add transactions upon reorg"
                            );
                        }
                        if service.config.maintain_transaction_pool {
                            let best = service.block_state.best_block_hash();
                            service.maintain_transaction_pool(&block, &best);
                        }
                    }
                }
            }
        }))
    }
}
