//! Import and finalisation notification loops.

use std::sync::Arc;

use shared_types::BlockNumber;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::DigestHandlerService;
use crate::error::DigestResult;

impl DigestHandlerService {
    /// Apply changes due at imported block `number`: clear a due resume,
    /// apply a due forced change.
    pub fn on_block_imported(&self, number: BlockNumber) -> DigestResult<()> {
        let mut pending = self.pending.lock();
        if pending.resume_due(number) {
            pending.resume = None;
            debug!(number, "[qc-02] GRANDPA resume reached");
        }
        if pending.forced_due(number) {
            let set_id = self.grandpa_state.increment_set_id()?;
            pending.forced = None;
            info!(number, set_id, "[qc-02] Forced change applied, set id incremented");
        }
        Ok(())
    }

    /// Apply changes due at finalised block `number`: clear a due pause,
    /// apply a due scheduled change, and drop any forced change.
    pub fn on_block_finalised(&self, number: BlockNumber) -> DigestResult<()> {
        let mut pending = self.pending.lock();
        if pending.pause_due(number) {
            pending.pause = None;
            debug!(number, "[qc-02] GRANDPA pause reached");
        }
        let result = if pending.scheduled_due(number) {
            self.grandpa_state.increment_set_id().map(|set_id| {
                pending.scheduled = None;
                info!(number, set_id, "[qc-02] Scheduled change applied, set id incremented");
            })
        } else {
            Ok(())
        };
        // A forced change not applied before finalisation belonged to a dead fork.
        if pending.forced.take().is_some() {
            debug!(number, "[qc-02] Dropped forced change on finalisation");
        }
        Ok(result?)
    }

    /// Spawn the import and finalisation loops. Each stops on shutdown or
    /// when its channel closes, then frees its channel. Returns no handles
    /// if already started.
    pub fn start(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(2);

        if let Some(mut channel) = self.imported.lock().take() {
            let service = Arc::clone(self);
            let mut shutdown = self.shutdown.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        maybe_block = channel.recv() => {
                            let Some(block) = maybe_block else { break };
                            if let Err(e) = service.on_block_imported(block.number()) {
                                error!(number = block.number(), error = %e, "[qc-02] Failed to handle GRANDPA changes on import");
                            }
                        }
                    }
                }
                service.block_state.free_imported_channel(channel.id);
                info!("[qc-02] Import notification loop stopped");
            }));
        }

        if let Some(mut channel) = self.finalised.lock().take() {
            let service = Arc::clone(self);
            let mut shutdown = self.shutdown.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown.changed() => break,
                        maybe_info = channel.recv() => {
                            let Some(info) = maybe_info else { break };
                            if let Err(e) = service.on_block_finalised(info.header.number) {
                                error!(number = info.header.number, error = %e, "[qc-02] Failed to handle GRANDPA changes on finalisation");
                            }
                        }
                    }
                }
                service.block_state.free_finalised_channel(channel.id);
                info!("[qc-02] Finalisation notification loop stopped");
            }));
        }

        handles
    }
}
