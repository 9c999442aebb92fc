//! Driven Ports (SPI - Outbound Dependencies)
//!
//! The storage layer serializes its own writes; these calls are synchronous.

use std::any::Any;
use std::sync::Arc;

use shared_types::{
    Block, BlockHeader, Body, Extrinsic, Hash, StorageError, TrieState, ValidTransaction, Validity,
};

use crate::domain::BlockAnnounceMessage;
use crate::error::{ImportResult, RuntimeError};

/// Opaque service handle passed through to a runtime unchanged.
pub type SharedHandle = Arc<dyn Any + Send + Sync>;

/// Host services a runtime instance was built with. A substituted runtime
/// inherits them from the instance it replaces.
#[derive(Clone, Default)]
pub struct RuntimeConfig {
    pub keystore: Option<SharedHandle>,
    pub node_storage: Option<SharedHandle>,
    pub network: Option<SharedHandle>,
    pub validator: bool,
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("keystore", &self.keystore.is_some())
            .field("node_storage", &self.node_storage.is_some())
            .field("network", &self.network.is_some())
            .field("validator", &self.validator)
            .finish()
    }
}

/// A live runtime able to validate transactions.
pub trait RuntimeInstance: Send + Sync {
    fn validate_transaction(&self, extrinsic: &Extrinsic) -> Result<Validity, RuntimeError>;

    fn config(&self) -> RuntimeConfig;
}

/// Builds runtime instances from raw code.
pub trait RuntimeBuilder: Send + Sync {
    fn instantiate(
        &self,
        code: &[u8],
        config: RuntimeConfig,
    ) -> Result<Arc<dyn RuntimeInstance>, RuntimeError>;
}

/// Persistent trie storage.
pub trait StorageState: Send + Sync {
    /// Commit the overlay produced by executing the block with this header.
    fn store_trie(&self, state: &TrieState, header: &BlockHeader) -> Result<(), StorageError>;
}

/// Chain index and per-block runtime registry.
pub trait BlockState: Send + Sync {
    /// Fails with `ParentNotFound` or `BlockExists` where applicable.
    fn add_block(&self, block: &Block) -> Result<(), StorageError>;

    fn get_runtime(&self, hash: &Hash) -> Result<Arc<dyn RuntimeInstance>, StorageError>;

    fn store_runtime(&self, hash: Hash, runtime: Arc<dyn RuntimeInstance>);

    /// Apply a runtime code or version change found in `state`.
    fn handle_runtime_changes(
        &self,
        state: &TrieState,
        parent_runtime: Arc<dyn RuntimeInstance>,
        hash: &Hash,
    ) -> Result<(), RuntimeError>;

    fn best_block_hash(&self) -> Hash;

    fn highest_common_ancestor(&self, a: &Hash, b: &Hash) -> Result<Hash, StorageError>;

    /// Hashes from `start` to `end` inclusive, ascending.
    fn subchain(&self, start: &Hash, end: &Hash) -> Result<Vec<Hash>, StorageError>;

    fn get_block_body(&self, hash: &Hash) -> Result<Body, StorageError>;
}

/// Records which block hashes had their runtime code substituted.
pub trait CodeSubstitutedState: Send + Sync {
    fn store_code_substituted_block_hash(&self, hash: &Hash) -> Result<(), StorageError>;
}

/// Consensus digest processing. Failures are handled inside.
pub trait DigestHandler: Send + Sync {
    fn handle_digests(&self, header: &BlockHeader);
}

/// Transaction pool and ready queue.
pub trait TransactionState: Send + Sync {
    fn pending_in_pool(&self) -> Vec<ValidTransaction>;

    /// Drop from pool and queue and free its status notifier.
    fn remove_extrinsic(&self, extrinsic: &Extrinsic);

    /// Drop from the pool only.
    fn remove_extrinsic_from_pool(&self, extrinsic: &Extrinsic);

    /// Queue a validated transaction.
    fn push(&self, transaction: ValidTransaction) -> ImportResult<Hash>;

    fn add_to_pool(&self, transaction: ValidTransaction) -> Hash;
}

/// Gossip sink.
pub trait Network: Send + Sync {
    fn gossip_message(&self, message: BlockAnnounceMessage);
}
