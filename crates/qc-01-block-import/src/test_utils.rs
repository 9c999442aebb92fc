//! Mock collaborators for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{
    Block, BlockHeader, Body, Digest, Extrinsic, Hash, StorageError, TrieState, ValidTransaction,
    Validity, ZERO_HASH,
};
use tokio::sync::watch;

use crate::config::BlockImportConfig;
use crate::domain::BlockAnnounceMessage;
use crate::error::{ImportResult, RuntimeError};
use crate::ports::outbound::*;
use crate::service::{BlockImportDependencies, BlockImportService};

/// Ordered record of collaborator calls.
pub type EventLog = Arc<Mutex<Vec<&'static str>>>;

pub fn genesis_block() -> Block {
    Block::new(
        BlockHeader::new(ZERO_HASH, 0, [0; 32], [0; 32], Digest::default()),
        vec![],
    )
}

/// A child of `parent`. `salt` separates sibling forks.
pub fn child_of(parent: &Block, salt: u8, body: Body) -> Block {
    Block::new(
        BlockHeader::new(
            parent.hash(),
            parent.number() + 1,
            [salt; 32],
            [0; 32],
            Digest::default(),
        ),
        body,
    )
}

pub fn ext(bytes: &[u8]) -> Extrinsic {
    Extrinsic::new(bytes.to_vec())
}

pub struct MockRuntime {
    pub config: RuntimeConfig,
    pub invalid: HashSet<Vec<u8>>,
    pub priority: u64,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            invalid: HashSet::new(),
            priority: 1,
        }
    }

    pub fn rejecting(invalid: &[&[u8]], priority: u64) -> Self {
        Self {
            config: RuntimeConfig::default(),
            invalid: invalid.iter().map(|b| b.to_vec()).collect(),
            priority,
        }
    }
}

impl RuntimeInstance for MockRuntime {
    fn validate_transaction(&self, extrinsic: &Extrinsic) -> Result<Validity, RuntimeError> {
        if self.invalid.contains(extrinsic.as_bytes()) {
            return Err(RuntimeError::InvalidTransaction("rejected".into()));
        }
        Ok(Validity {
            priority: self.priority,
            requires: vec![],
            provides: vec![extrinsic.as_bytes().to_vec()],
            longevity: 64,
            propagate: true,
        })
    }

    fn config(&self) -> RuntimeConfig {
        self.config.clone()
    }
}

pub struct MockStorageState {
    events: EventLog,
    pub fail: AtomicBool,
    pub stored: Mutex<Vec<Hash>>,
}

impl StorageState for MockStorageState {
    fn store_trie(&self, _state: &TrieState, header: &BlockHeader) -> Result<(), StorageError> {
        self.events.lock().push("store_trie");
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::DatabaseError("commit failed".into()));
        }
        self.stored.lock().push(header.hash());
        Ok(())
    }
}

pub struct MockBlockState {
    events: EventLog,
    blocks: Mutex<HashMap<Hash, Block>>,
    runtimes: Mutex<HashMap<Hash, Arc<dyn RuntimeInstance>>>,
    best: Mutex<Hash>,
    pub fail_runtime_lookup: AtomicBool,
    pub fail_runtime_changes: AtomicBool,
    pub runtime_changes: Mutex<Vec<Hash>>,
}

impl MockBlockState {
    pub fn new(events: EventLog, runtime: Arc<dyn RuntimeInstance>) -> Self {
        let genesis = genesis_block();
        let hash = genesis.hash();
        Self {
            events,
            blocks: Mutex::new(HashMap::from([(hash, genesis)])),
            runtimes: Mutex::new(HashMap::from([(hash, runtime)])),
            best: Mutex::new(hash),
            fail_runtime_lookup: AtomicBool::new(false),
            fail_runtime_changes: AtomicBool::new(false),
            runtime_changes: Mutex::new(Vec::new()),
        }
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.blocks.lock().contains_key(hash)
    }

    pub fn set_best(&self, hash: Hash) {
        *self.best.lock() = hash;
    }

    pub fn runtime_at(&self, hash: &Hash) -> Option<Arc<dyn RuntimeInstance>> {
        self.runtimes.lock().get(hash).cloned()
    }

    fn ancestry(&self, hash: &Hash) -> Vec<Hash> {
        let blocks = self.blocks.lock();
        let mut out = Vec::new();
        let mut current = *hash;
        while let Some(block) = blocks.get(&current) {
            out.push(current);
            if block.number() == 0 {
                break;
            }
            current = block.header.parent_hash;
        }
        out
    }
}

impl BlockState for MockBlockState {
    fn add_block(&self, block: &Block) -> Result<(), StorageError> {
        self.events.lock().push("add_block");
        let hash = block.hash();
        let mut blocks = self.blocks.lock();
        if blocks.contains_key(&hash) {
            return Err(StorageError::BlockExists(hash));
        }
        if !blocks.contains_key(&block.header.parent_hash) {
            return Err(StorageError::ParentNotFound {
                parent_hash: block.header.parent_hash,
            });
        }
        let best_number = blocks
            .get(&*self.best.lock())
            .map(Block::number)
            .unwrap_or(0);
        if block.number() > best_number {
            *self.best.lock() = hash;
        }
        blocks.insert(hash, block.clone());
        Ok(())
    }

    fn get_runtime(&self, hash: &Hash) -> Result<Arc<dyn RuntimeInstance>, StorageError> {
        self.events.lock().push("get_runtime");
        if self.fail_runtime_lookup.load(Ordering::SeqCst) {
            return Err(StorageError::RuntimeNotFound(*hash));
        }
        let runtimes = self.runtimes.lock();
        self.ancestry(hash)
            .iter()
            .find_map(|h| runtimes.get(h).cloned())
            .ok_or(StorageError::RuntimeNotFound(*hash))
    }

    fn store_runtime(&self, hash: Hash, runtime: Arc<dyn RuntimeInstance>) {
        self.runtimes.lock().insert(hash, runtime);
    }

    fn handle_runtime_changes(
        &self,
        _state: &TrieState,
        _parent_runtime: Arc<dyn RuntimeInstance>,
        hash: &Hash,
    ) -> Result<(), RuntimeError> {
        self.events.lock().push("handle_runtime_changes");
        if self.fail_runtime_changes.load(Ordering::SeqCst) {
            return Err(RuntimeError::Upgrade("bad code".into()));
        }
        self.runtime_changes.lock().push(*hash);
        Ok(())
    }

    fn best_block_hash(&self) -> Hash {
        *self.best.lock()
    }

    fn highest_common_ancestor(&self, a: &Hash, b: &Hash) -> Result<Hash, StorageError> {
        let left: HashSet<Hash> = self.ancestry(a).into_iter().collect();
        self.ancestry(b)
            .into_iter()
            .find(|h| left.contains(h))
            .ok_or(StorageError::NoCommonAncestor(*a, *b))
    }

    fn subchain(&self, start: &Hash, end: &Hash) -> Result<Vec<Hash>, StorageError> {
        let mut chain = Vec::new();
        for hash in self.ancestry(end) {
            chain.push(hash);
            if hash == *start {
                chain.reverse();
                return Ok(chain);
            }
        }
        Err(StorageError::BlockNotFound(*start))
    }

    fn get_block_body(&self, hash: &Hash) -> Result<Body, StorageError> {
        self.blocks
            .lock()
            .get(hash)
            .map(|b| b.body.clone())
            .ok_or(StorageError::BlockNotFound(*hash))
    }
}

#[derive(Default)]
pub struct MockRuntimeBuilder {
    pub fail_times: AtomicUsize,
    pub instantiated: Mutex<Vec<(Vec<u8>, RuntimeConfig)>>,
}

impl RuntimeBuilder for MockRuntimeBuilder {
    fn instantiate(
        &self,
        code: &[u8],
        config: RuntimeConfig,
    ) -> Result<Arc<dyn RuntimeInstance>, RuntimeError> {
        self.instantiated.lock().push((code.to_vec(), config.clone()));
        if self.fail_times.load(Ordering::SeqCst) > 0 {
            self.fail_times.fetch_sub(1, Ordering::SeqCst);
            return Err(RuntimeError::Instantiation("bad wasm".into()));
        }
        Ok(Arc::new(MockRuntime {
            config,
            invalid: HashSet::new(),
            priority: 99,
        }))
    }
}

#[derive(Default)]
pub struct MockCodeSubstitutedState {
    pub recorded: Mutex<Vec<Hash>>,
}

impl CodeSubstitutedState for MockCodeSubstitutedState {
    fn store_code_substituted_block_hash(&self, hash: &Hash) -> Result<(), StorageError> {
        self.recorded.lock().push(*hash);
        Ok(())
    }
}

pub struct MockDigestHandler {
    events: EventLog,
    pub handled: Mutex<Vec<Hash>>,
}

impl DigestHandler for MockDigestHandler {
    fn handle_digests(&self, header: &BlockHeader) {
        self.events.lock().push("handle_digests");
        self.handled.lock().push(header.hash());
    }
}

#[derive(Default)]
pub struct MockTransactionState {
    pub pool: Mutex<Vec<ValidTransaction>>,
    pub queue: Mutex<Vec<ValidTransaction>>,
    /// Extrinsics fully removed, with their notifier freed.
    pub removed: Mutex<Vec<Extrinsic>>,
    pub removed_from_pool: Mutex<Vec<Extrinsic>>,
}

impl MockTransactionState {
    pub fn seed(&self, extrinsic: Extrinsic) {
        self.pool
            .lock()
            .push(ValidTransaction::new(extrinsic, Validity::default()));
    }
}

impl TransactionState for MockTransactionState {
    fn pending_in_pool(&self) -> Vec<ValidTransaction> {
        self.pool.lock().clone()
    }

    fn remove_extrinsic(&self, extrinsic: &Extrinsic) {
        self.pool.lock().retain(|tx| &tx.extrinsic != extrinsic);
        self.queue.lock().retain(|tx| &tx.extrinsic != extrinsic);
        self.removed.lock().push(extrinsic.clone());
    }

    fn remove_extrinsic_from_pool(&self, extrinsic: &Extrinsic) {
        self.pool.lock().retain(|tx| &tx.extrinsic != extrinsic);
        self.removed_from_pool.lock().push(extrinsic.clone());
    }

    fn push(&self, transaction: ValidTransaction) -> ImportResult<Hash> {
        let hash = shared_types::blake2_256(transaction.extrinsic.as_bytes());
        self.queue.lock().push(transaction);
        Ok(hash)
    }

    fn add_to_pool(&self, transaction: ValidTransaction) -> Hash {
        let hash = shared_types::blake2_256(transaction.extrinsic.as_bytes());
        self.pool.lock().push(transaction);
        hash
    }
}

#[derive(Default)]
pub struct MockNetwork {
    pub messages: Mutex<Vec<BlockAnnounceMessage>>,
}

impl Network for MockNetwork {
    fn gossip_message(&self, message: BlockAnnounceMessage) {
        self.messages.lock().push(message);
    }
}

/// A service wired to fresh mocks.
pub struct TestContext {
    pub service: Arc<BlockImportService>,
    pub events: EventLog,
    pub storage: Arc<MockStorageState>,
    pub blocks: Arc<MockBlockState>,
    pub builder: Arc<MockRuntimeBuilder>,
    pub substituted: Arc<MockCodeSubstitutedState>,
    pub digests: Arc<MockDigestHandler>,
    pub transactions: Arc<MockTransactionState>,
    pub network: Arc<MockNetwork>,
    pub shutdown_tx: watch::Sender<bool>,
}

impl TestContext {
    pub fn new(config: BlockImportConfig) -> Self {
        Self::with_runtime(config, MockRuntime::new())
    }

    pub fn with_runtime(config: BlockImportConfig, runtime: MockRuntime) -> Self {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let storage = Arc::new(MockStorageState {
            events: events.clone(),
            fail: AtomicBool::new(false),
            stored: Mutex::new(Vec::new()),
        });
        let blocks = Arc::new(MockBlockState::new(events.clone(), Arc::new(runtime)));
        let builder = Arc::new(MockRuntimeBuilder::default());
        let substituted = Arc::new(MockCodeSubstitutedState::default());
        let digests = Arc::new(MockDigestHandler {
            events: events.clone(),
            handled: Mutex::new(Vec::new()),
        });
        let transactions = Arc::new(MockTransactionState::default());
        let network = Arc::new(MockNetwork::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let deps = BlockImportDependencies {
            storage_state: storage.clone(),
            block_state: blocks.clone(),
            runtime_builder: builder.clone(),
            code_substituted_state: substituted.clone(),
            digest_handler: digests.clone(),
            transaction_state: transactions.clone(),
            network: network.clone(),
        };
        let service = Arc::new(BlockImportService::new(deps, config, shutdown_rx).unwrap());

        Self {
            service,
            events,
            storage,
            blocks,
            builder,
            substituted,
            digests,
            transactions,
            network,
            shutdown_tx,
        }
    }

    pub fn genesis(&self) -> Block {
        genesis_block()
    }
}
