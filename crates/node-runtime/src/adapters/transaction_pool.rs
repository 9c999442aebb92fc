//! # Transaction Pool
//!
//! Pool of validated transactions awaiting inclusion plus the ready queue
//! block production draws from. Transactions are keyed by the Blake2b hash
//! of their extrinsic.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use qc_01_block_import::{ImportError, ImportResult, TransactionState};
use shared_types::{blake2_256, short_hex, Extrinsic, Hash, ValidTransaction};
use tracing::debug;

#[derive(Default)]
pub struct InMemoryTransactionPool {
    pool: RwLock<HashMap<Hash, ValidTransaction>>,
    /// Ready queue ordered by hash for deterministic iteration.
    queue: RwLock<BTreeMap<Hash, ValidTransaction>>,
    /// Status watchers per transaction, dropped when it leaves the pool.
    watchers: RwLock<HashMap<Hash, u32>>,
}

impl InMemoryTransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a transaction and watch its status.
    pub fn submit(&self, transaction: ValidTransaction) -> Hash {
        let hash = self.add_to_pool(transaction);
        *self.watchers.write().entry(hash).or_default() += 1;
        hash
    }

    pub fn pool_len(&self) -> usize {
        self.pool.read().len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.read().len()
    }

    pub fn in_pool(&self, extrinsic: &Extrinsic) -> bool {
        self.pool.read().contains_key(&blake2_256(extrinsic.as_bytes()))
    }

    pub fn queued(&self) -> Vec<ValidTransaction> {
        self.queue.read().values().cloned().collect()
    }

    pub fn is_watched(&self, extrinsic: &Extrinsic) -> bool {
        self.watchers
            .read()
            .contains_key(&blake2_256(extrinsic.as_bytes()))
    }
}

impl TransactionState for InMemoryTransactionPool {
    fn pending_in_pool(&self) -> Vec<ValidTransaction> {
        self.pool.read().values().cloned().collect()
    }

    fn remove_extrinsic(&self, extrinsic: &Extrinsic) {
        let hash = blake2_256(extrinsic.as_bytes());
        self.pool.write().remove(&hash);
        self.queue.write().remove(&hash);
        if self.watchers.write().remove(&hash).is_some() {
            debug!(tx = %short_hex(&hash), "[pool] Status watcher freed");
        }
    }

    fn remove_extrinsic_from_pool(&self, extrinsic: &Extrinsic) {
        self.pool.write().remove(&blake2_256(extrinsic.as_bytes()));
    }

    fn push(&self, transaction: ValidTransaction) -> ImportResult<Hash> {
        let hash = blake2_256(transaction.extrinsic.as_bytes());
        let mut queue = self.queue.write();
        if queue.contains_key(&hash) {
            return Err(ImportError::PoolRejected(format!(
                "transaction {} already queued",
                short_hex(&hash)
            )));
        }
        queue.insert(hash, transaction);
        Ok(hash)
    }

    fn add_to_pool(&self, transaction: ValidTransaction) -> Hash {
        let hash = blake2_256(transaction.extrinsic.as_bytes());
        self.pool.write().insert(hash, transaction);
        hash
    }
}
