//! # Block Import Service
//!
//! Applies blocks to chain state.
//!
//! ## Apply step
//!
//! 1. Reject malformed input
//! 2. Commit the trie overlay (the block is never indexed without its state)
//! 3. Index the block; an already-indexed block is not an error
//! 4. Hand the header to the digest handler
//! 5. Look up the parent runtime and apply runtime changes
//! 6. Apply any configured code substitute for this hash
//! 7. Queue the block for pool maintenance unless shutting down

mod intake;
mod pool;

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{short_hex, Block, Hash, StorageError, TrieState};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::config::BlockImportConfig;
use crate::domain::{BlockAnnounceMessage, CodeSubstitutes};
use crate::error::{ImportError, ImportResult};
use crate::ports::inbound::BlockImportApi;
use crate::ports::outbound::{
    BlockState, CodeSubstitutedState, DigestHandler, Network, RuntimeBuilder, RuntimeInstance,
    StorageState, TransactionState,
};

/// Dependencies for BlockImportService
pub struct BlockImportDependencies {
    pub storage_state: Arc<dyn StorageState>,
    pub block_state: Arc<dyn BlockState>,
    pub runtime_builder: Arc<dyn RuntimeBuilder>,
    pub code_substituted_state: Arc<dyn CodeSubstitutedState>,
    pub digest_handler: Arc<dyn DigestHandler>,
    pub transaction_state: Arc<dyn TransactionState>,
    pub network: Arc<dyn Network>,
}

/// The Block Import Coordinator.
pub struct BlockImportService {
    pub(crate) storage_state: Arc<dyn StorageState>,
    pub(crate) block_state: Arc<dyn BlockState>,
    pub(crate) runtime_builder: Arc<dyn RuntimeBuilder>,
    pub(crate) code_substituted_state: Arc<dyn CodeSubstitutedState>,
    pub(crate) digest_handler: Arc<dyn DigestHandler>,
    pub(crate) transaction_state: Arc<dyn TransactionState>,
    pub(crate) network: Arc<dyn Network>,
    pub(crate) config: BlockImportConfig,
    code_substitutes: CodeSubstitutes,
    /// Substitutes whose instantiation failed; retried on next runtime lookup.
    pending_substitutions: Mutex<HashSet<Hash>>,
    /// One apply step at a time.
    import_lock: Mutex<()>,
    intake_tx: mpsc::UnboundedSender<Block>,
    pub(crate) intake_rx: Mutex<Option<mpsc::UnboundedReceiver<Block>>>,
    pub(crate) shutdown: watch::Receiver<bool>,
}

impl BlockImportService {
    /// Create the coordinator. Fails if a configured code substitute does
    /// not parse.
    pub fn new(
        deps: BlockImportDependencies,
        config: BlockImportConfig,
        shutdown: watch::Receiver<bool>,
    ) -> ImportResult<Self> {
        let code_substitutes = CodeSubstitutes::parse(&config.code_substitutes)?;
        if !code_substitutes.is_empty() {
            info!(
                count = code_substitutes.len(),
                "[qc-01] Loaded runtime code substitutes"
            );
        }
        let (intake_tx, intake_rx) = mpsc::unbounded_channel();
        Ok(Self {
            storage_state: deps.storage_state,
            block_state: deps.block_state,
            runtime_builder: deps.runtime_builder,
            code_substituted_state: deps.code_substituted_state,
            digest_handler: deps.digest_handler,
            transaction_state: deps.transaction_state,
            network: deps.network,
            config,
            code_substitutes,
            pending_substitutions: Mutex::new(HashSet::new()),
            import_lock: Mutex::new(()),
            intake_tx,
            intake_rx: Mutex::new(Some(intake_rx)),
            shutdown,
        })
    }

    /// Hashes whose code substitute is still waiting to be applied.
    pub fn pending_substitutions(&self) -> Vec<Hash> {
        self.pending_substitutions.lock().iter().copied().collect()
    }

    fn apply_block(&self, block: Block, state: TrieState) -> ImportResult<()> {
        if block.header.number == 0 {
            return Err(ImportError::InvalidParameter("genesis block cannot be imported"));
        }

        let _guard = self.import_lock.lock();
        let hash = block.hash();

        self.storage_state.store_trie(&state, &block.header)?;

        match self.block_state.add_block(&block) {
            Ok(()) => {}
            Err(StorageError::BlockExists(_)) => {
                debug!(number = block.header.number, hash = %short_hex(&hash), "[qc-01] Block already indexed");
            }
            Err(StorageError::ParentNotFound { parent_hash }) => {
                return Err(ImportError::ParentNotFound(parent_hash));
            }
            Err(e) => return Err(e.into()),
        }

        debug!(
            number = block.header.number,
            hash = %short_hex(&hash),
            state_root = %short_hex(&state.root()),
            "[qc-01] Imported block and stored state trie"
        );

        self.digest_handler.handle_digests(&block.header);

        let parent_runtime = self.runtime_for(&block.header.parent_hash)?;

        if let Err(e) = self
            .block_state
            .handle_runtime_changes(&state, parent_runtime, &hash)
        {
            error!(hash = %short_hex(&hash), error = %e, "[qc-01] Failed to update runtime code");
            return Err(e.into());
        }

        self.handle_code_substitution(&hash);
        self.enqueue(block);
        Ok(())
    }

    /// Runtime at `hash`, retrying a pending code substitute first.
    fn runtime_for(&self, hash: &Hash) -> ImportResult<Arc<dyn RuntimeInstance>> {
        let pending = self.pending_substitutions.lock().contains(hash);
        if pending {
            self.handle_code_substitution(hash);
        }
        Ok(self.block_state.get_runtime(hash)?)
    }

    fn handle_code_substitution(&self, hash: &Hash) {
        if !self.code_substitutes.contains(hash) {
            return;
        }
        match self.apply_code_substitution(hash) {
            Ok(()) => {
                self.pending_substitutions.lock().remove(hash);
            }
            Err(e) => {
                warn!(
                    hash = %short_hex(hash),
                    error = %e,
                    "[qc-01] Code substitution failed, will retry on next runtime lookup"
                );
                self.pending_substitutions.lock().insert(*hash);
            }
        }
    }

    fn apply_code_substitution(&self, hash: &Hash) -> ImportResult<()> {
        let Some(code) = self.code_substitutes.code(hash) else {
            return Ok(());
        };
        let code = code?;

        // A fresh instance, so blocks still on the current runtime keep it.
        let current = self.block_state.get_runtime(hash)?;
        let next = self.runtime_builder.instantiate(code, current.config())?;
        self.block_state.store_runtime(*hash, next);

        if let Err(e) = self
            .code_substituted_state
            .store_code_substituted_block_hash(hash)
        {
            warn!(hash = %short_hex(hash), error = %e, "[qc-01] Failed to record code substitution");
        }

        info!(hash = %short_hex(hash), code_len = code.len(), "[qc-01] Applied runtime code substitute");
        Ok(())
    }

    fn enqueue(&self, block: Block) {
        if *self.shutdown.borrow() {
            return;
        }
        if self.intake_tx.send(block).is_err() {
            debug!("[qc-01] Intake queue closed, block not queued");
        }
    }
}

impl BlockImportApi for BlockImportService {
    fn handle_block(&self, block: Block, state: TrieState) -> ImportResult<()> {
        self.apply_block(block, state)
    }

    fn handle_block_produced(&self, block: Block, state: TrieState) -> ImportResult<()> {
        let message = BlockAnnounceMessage::from_header(&block.header, true);
        self.apply_block(block, state)?;
        self.network.gossip_message(message);
        Ok(())
    }
}
