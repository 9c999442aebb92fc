//! Transaction pool upkeep after a new best block.

use shared_types::{short_hex, Block, Hash, ValidTransaction};
use tracing::{debug, warn};

use super::BlockImportService;
use crate::error::ImportResult;

impl BlockImportService {
    /// Prune extrinsics included in `block`, then revalidate everything
    /// still pending against the runtime at `best_hash`.
    pub fn maintain_transaction_pool(&self, block: &Block, best_hash: &Hash) {
        for extrinsic in &block.body {
            self.transaction_state.remove_extrinsic(extrinsic);
        }

        let pending = self.transaction_state.pending_in_pool();
        if pending.is_empty() {
            return;
        }

        let runtime = match self.block_state.get_runtime(best_hash) {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!(best = %short_hex(best_hash), error = %e, "[qc-01] No runtime for pool revalidation");
                return;
            }
        };

        for tx in pending {
            match runtime.validate_transaction(&tx.extrinsic) {
                Ok(validity) => {
                    self.transaction_state
                        .remove_extrinsic_from_pool(&tx.extrinsic);
                    let requeued = ValidTransaction::new(tx.extrinsic, validity);
                    if let Err(e) = self.transaction_state.push(requeued) {
                        warn!(error = %e, "[qc-01] Failed to requeue revalidated transaction");
                    }
                }
                Err(e) => {
                    debug!(error = %e, "[qc-01] Dropping transaction that failed revalidation");
                    self.transaction_state.remove_extrinsic(&tx.extrinsic);
                }
            }
        }
    }

    /// Return extrinsics from a retracted branch to the pool.
    ///
    /// No-op when `curr` extends `prev`.
    pub fn handle_chain_reorg(&self, prev: &Hash, curr: &Hash) -> ImportResult<()> {
        let ancestor = self.block_state.highest_common_ancestor(prev, curr)?;
        if ancestor == *prev {
            return Ok(());
        }

        let subchain = self.block_state.subchain(&ancestor, prev)?;
        // First entry is the ancestor itself.
        let Some(retracted) = subchain.get(1..) else {
            return Ok(());
        };
        if retracted.is_empty() {
            return Ok(());
        }

        debug!(
            ancestor = %short_hex(&ancestor),
            retracted = retracted.len(),
            "[qc-01] Chain reorg, re-adding retracted extrinsics"
        );

        let best = self.block_state.best_block_hash();
        let runtime = self.block_state.get_runtime(&best)?;

        for hash in retracted {
            let body = match self.block_state.get_block_body(hash) {
                Ok(body) => body,
                Err(e) => {
                    debug!(hash = %short_hex(hash), error = %e, "[qc-01] Retracted block body unavailable");
                    continue;
                }
            };
            for extrinsic in body {
                match runtime.validate_transaction(&extrinsic) {
                    Ok(validity) => {
                        self.transaction_state
                            .add_to_pool(ValidTransaction::new(extrinsic, validity));
                    }
                    Err(e) => {
                        debug!(error = %e, "[qc-01] Retracted extrinsic no longer valid");
                    }
                }
            }
        }
        Ok(())
    }
}
