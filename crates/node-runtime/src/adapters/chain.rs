//! # In-Memory Chain
//!
//! Block index, trie storage and runtime registry in one process-local
//! store. Implements the storage ports of all three subsystems.
//!
//! The best block is the highest known block; ties keep the current head.
//! The canonical index is rebuilt from the head whenever it moves.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use qc_01_block_import::{RuntimeBuilder, RuntimeError, RuntimeInstance};
use shared_bus::{FinalisedNotifier, ImportedNotifier, NotifierChannel, NotifierId};
use shared_types::{
    short_hex, Block, BlockHeader, BlockNumber, Body, FinalisationInfo, Hash, StorageError,
    TrieState,
};
use tracing::{debug, info, warn};

/// Storage key holding runtime code.
pub const CODE_KEY: &[u8] = b":code";

#[derive(Default)]
struct ChainIndex {
    headers: HashMap<Hash, BlockHeader>,
    bodies: HashMap<Hash, Body>,
    /// Canonical hash per number, genesis at 0.
    canonical: Vec<Hash>,
    best: Hash,
    finalised: BlockNumber,
    tries: HashMap<Hash, TrieState>,
    runtimes: HashMap<Hash, Arc<dyn RuntimeInstance>>,
    receipts: HashMap<Hash, Vec<u8>>,
    message_queues: HashMap<Hash, Vec<u8>>,
    justifications: HashMap<Hash, Vec<u8>>,
    substituted: HashSet<Hash>,
}

impl ChainIndex {
    fn header(&self, hash: &Hash) -> Result<&BlockHeader, StorageError> {
        self.headers.get(hash).ok_or(StorageError::BlockNotFound(*hash))
    }

    /// Ancestor of `hash` at `number`, or `hash` itself.
    fn ancestor_at(&self, hash: &Hash, number: BlockNumber) -> Result<Hash, StorageError> {
        let mut current = *hash;
        let mut header = self.header(&current)?;
        while header.number > number {
            current = header.parent_hash;
            header = self.header(&current)?;
        }
        Ok(current)
    }

    fn set_head(&mut self, head: Hash) -> Result<(), StorageError> {
        let number = self.header(&head)?.number as usize;
        self.canonical.truncate(number + 1);
        self.canonical.resize(number + 1, head);
        let mut current = head;
        for slot in (0..=number).rev() {
            if self.canonical[slot] == current && slot != number {
                // Rest of the index is shared with the previous head.
                break;
            }
            self.canonical[slot] = current;
            current = self.header(&current)?.parent_hash;
        }
        self.best = head;
        Ok(())
    }
}

/// Process-local chain store.
pub struct InMemoryChain {
    index: RwLock<ChainIndex>,
    imported: ImportedNotifier,
    finalised: FinalisedNotifier,
    runtime_builder: Arc<dyn RuntimeBuilder>,
}

impl InMemoryChain {
    /// A chain holding only `genesis`, executed with `runtime`.
    pub fn new(
        genesis: &Block,
        genesis_state: TrieState,
        runtime: Arc<dyn RuntimeInstance>,
        runtime_builder: Arc<dyn RuntimeBuilder>,
    ) -> Self {
        let hash = genesis.hash();
        let mut index = ChainIndex {
            best: hash,
            canonical: vec![hash],
            ..ChainIndex::default()
        };
        index.headers.insert(hash, genesis.header.clone());
        index.bodies.insert(hash, genesis.body.clone());
        index.tries.insert(hash, genesis_state);
        index.runtimes.insert(hash, runtime);

        info!(genesis = %short_hex(&hash), "[chain] In-memory chain initialised");

        Self {
            index: RwLock::new(index),
            imported: ImportedNotifier::imported(),
            finalised: FinalisedNotifier::finalised(),
            runtime_builder,
        }
    }

    pub fn best_hash(&self) -> Hash {
        self.index.read().best
    }

    pub fn best_number(&self) -> BlockNumber {
        self.index.read().canonical.len() as BlockNumber - 1
    }

    pub fn header(&self, hash: &Hash) -> Result<BlockHeader, StorageError> {
        self.index.read().header(hash).cloned()
    }

    pub fn body(&self, hash: &Hash) -> Result<Body, StorageError> {
        self.index
            .read()
            .bodies
            .get(hash)
            .cloned()
            .ok_or(StorageError::DataNotFound {
                what: "body",
                hash: *hash,
            })
    }

    pub fn canonical_hash(&self, number: BlockNumber) -> Result<Hash, StorageError> {
        self.index
            .read()
            .canonical
            .get(number as usize)
            .copied()
            .ok_or(StorageError::NumberNotFound(number))
    }

    /// Every known block at `number`, canonical first.
    pub fn blocks_at(&self, number: BlockNumber) -> Vec<Hash> {
        let index = self.index.read();
        let canonical = index.canonical.get(number as usize).copied();
        let mut hashes: Vec<Hash> = index
            .headers
            .iter()
            .filter(|(_, header)| header.number == number)
            .map(|(hash, _)| *hash)
            .collect();
        hashes.sort_by_key(|hash| (Some(*hash) != canonical, *hash));
        hashes
    }

    pub fn is_descendant(&self, ancestor: &Hash, descendant: &Hash) -> Result<bool, StorageError> {
        let index = self.index.read();
        let number = index.header(ancestor)?.number;
        Ok(index.ancestor_at(descendant, number)? == *ancestor)
    }

    /// Hashes from `start` to `end` inclusive, ascending.
    pub fn subchain_between(&self, start: &Hash, end: &Hash) -> Result<Vec<Hash>, StorageError> {
        let index = self.index.read();
        let start_number = index.header(start)?.number;
        let mut hashes = Vec::new();
        let mut current = *end;
        loop {
            let header = index.header(&current)?;
            if header.number < start_number {
                return Err(StorageError::NoCommonAncestor(*start, *end));
            }
            hashes.push(current);
            if current == *start {
                break;
            }
            current = header.parent_hash;
        }
        hashes.reverse();
        Ok(hashes)
    }

    pub fn common_ancestor(&self, a: &Hash, b: &Hash) -> Result<Hash, StorageError> {
        let index = self.index.read();
        let number = index.header(a)?.number.min(index.header(b)?.number);
        let mut left = index.ancestor_at(a, number)?;
        let mut right = index.ancestor_at(b, number)?;
        while left != right {
            let (l, r) = (index.header(&left)?, index.header(&right)?);
            if l.number == 0 {
                return Err(StorageError::NoCommonAncestor(*a, *b));
            }
            left = l.parent_hash;
            right = r.parent_hash;
        }
        Ok(left)
    }

    /// Committed trie state of `hash`.
    pub fn trie(&self, hash: &Hash) -> Option<TrieState> {
        self.index.read().tries.get(hash).cloned()
    }

    pub fn runtime(&self, hash: &Hash) -> Result<Arc<dyn RuntimeInstance>, StorageError> {
        self.index
            .read()
            .runtimes
            .get(hash)
            .cloned()
            .ok_or(StorageError::RuntimeNotFound(*hash))
    }

    pub fn is_code_substituted(&self, hash: &Hash) -> bool {
        self.index.read().substituted.contains(hash)
    }

    pub fn set_receipt(&self, hash: Hash, receipt: Vec<u8>) {
        self.index.write().receipts.insert(hash, receipt);
    }

    pub fn set_message_queue(&self, hash: Hash, queue: Vec<u8>) {
        self.index.write().message_queues.insert(hash, queue);
    }

    pub fn finalised_number(&self) -> BlockNumber {
        self.index.read().finalised
    }

    /// Mark `hash` final, store its justification and notify subscribers.
    pub fn finalise(
        &self,
        hash: &Hash,
        round: u64,
        set_id: u64,
        justification: Vec<u8>,
    ) -> Result<(), StorageError> {
        let header = {
            let mut index = self.index.write();
            let header = index.header(hash)?.clone();
            index.finalised = index.finalised.max(header.number);
            index.justifications.insert(*hash, justification);
            header
        };
        info!(
            number = header.number,
            hash = %short_hex(hash),
            round,
            set_id,
            "[chain] Block finalised"
        );
        self.finalised.notify(&FinalisationInfo {
            header,
            round,
            set_id,
        });
        Ok(())
    }

    fn extra(
        map: &HashMap<Hash, Vec<u8>>,
        what: &'static str,
        hash: &Hash,
    ) -> Result<Vec<u8>, StorageError> {
        map.get(hash)
            .cloned()
            .ok_or(StorageError::DataNotFound { what, hash: *hash })
    }
}

impl qc_01_block_import::StorageState for InMemoryChain {
    fn store_trie(&self, state: &TrieState, header: &BlockHeader) -> Result<(), StorageError> {
        let hash = header.hash();
        let mut index = self.index.write();
        let mut committed = index
            .tries
            .get(&header.parent_hash)
            .cloned()
            .unwrap_or_default();
        for (key, value) in state.changes() {
            match value {
                Some(value) => committed.set(key, value),
                None => committed.delete(key),
            }
        }
        debug!(
            hash = %short_hex(&hash),
            changes = state.len(),
            root = %short_hex(&committed.root()),
            "[chain] Trie committed"
        );
        index.tries.insert(hash, committed);
        Ok(())
    }
}

impl qc_01_block_import::BlockState for InMemoryChain {
    fn add_block(&self, block: &Block) -> Result<(), StorageError> {
        let hash = block.hash();
        {
            let mut index = self.index.write();
            if index.headers.contains_key(&hash) {
                return Err(StorageError::BlockExists(hash));
            }
            if !index.headers.contains_key(&block.header.parent_hash) {
                return Err(StorageError::ParentNotFound {
                    parent_hash: block.header.parent_hash,
                });
            }
            index.headers.insert(hash, block.header.clone());
            index.bodies.insert(hash, block.body.clone());

            let best_number = index.header(&index.best)?.number;
            if block.number() > best_number {
                index.set_head(hash)?;
            }
        }
        self.imported.notify(block);
        Ok(())
    }

    fn get_runtime(&self, hash: &Hash) -> Result<Arc<dyn RuntimeInstance>, StorageError> {
        self.runtime(hash)
    }

    fn store_runtime(&self, hash: Hash, runtime: Arc<dyn RuntimeInstance>) {
        self.index.write().runtimes.insert(hash, runtime);
    }

    fn handle_runtime_changes(
        &self,
        state: &TrieState,
        parent_runtime: Arc<dyn RuntimeInstance>,
        hash: &Hash,
    ) -> Result<(), RuntimeError> {
        let runtime = match state.get(CODE_KEY) {
            Some(code) => {
                info!(hash = %short_hex(hash), code_len = code.len(), "[chain] Runtime code updated");
                self.runtime_builder.instantiate(code, parent_runtime.config())?
            }
            None => parent_runtime,
        };
        self.index.write().runtimes.insert(*hash, runtime);
        Ok(())
    }

    fn best_block_hash(&self) -> Hash {
        self.best_hash()
    }

    fn highest_common_ancestor(&self, a: &Hash, b: &Hash) -> Result<Hash, StorageError> {
        self.common_ancestor(a, b)
    }

    fn subchain(&self, start: &Hash, end: &Hash) -> Result<Vec<Hash>, StorageError> {
        self.subchain_between(start, end)
    }

    fn get_block_body(&self, hash: &Hash) -> Result<Body, StorageError> {
        self.body(hash)
    }
}

impl qc_01_block_import::CodeSubstitutedState for InMemoryChain {
    fn store_code_substituted_block_hash(&self, hash: &Hash) -> Result<(), StorageError> {
        if !self.index.write().substituted.insert(*hash) {
            warn!(hash = %short_hex(hash), "[chain] Code substitution already recorded");
        }
        Ok(())
    }
}

impl qc_02_digest_handler::BlockState for InMemoryChain {
    fn best_block_header(&self) -> Result<BlockHeader, StorageError> {
        let index = self.index.read();
        index.header(&index.best).cloned()
    }

    fn register_imported_channel(&self, buffer: usize) -> NotifierChannel<Block> {
        self.imported.register(buffer)
    }

    fn free_imported_channel(&self, id: NotifierId) {
        if let Err(e) = self.imported.free(id) {
            warn!(id, error = %e, "[chain] Failed to free import channel");
        }
    }

    fn register_finalised_channel(&self, buffer: usize) -> NotifierChannel<FinalisationInfo> {
        self.finalised.register(buffer)
    }

    fn free_finalised_channel(&self, id: NotifierId) {
        if let Err(e) = self.finalised.free(id) {
            warn!(id, error = %e, "[chain] Failed to free finalisation channel");
        }
    }
}

impl qc_03_chain_sync::BlockState for InMemoryChain {
    fn best_block_number(&self) -> Result<BlockNumber, StorageError> {
        Ok(self.best_number())
    }

    fn get_header(&self, hash: &Hash) -> Result<BlockHeader, StorageError> {
        self.header(hash)
    }

    fn get_hash_by_number(&self, number: BlockNumber) -> Result<Hash, StorageError> {
        self.canonical_hash(number)
    }

    fn get_header_by_number(&self, number: BlockNumber) -> Result<BlockHeader, StorageError> {
        let hash = self.canonical_hash(number)?;
        self.header(&hash)
    }

    fn get_all_blocks_at_number(&self, number: BlockNumber) -> Result<Vec<Hash>, StorageError> {
        Ok(self.blocks_at(number))
    }

    fn is_descendant_of(&self, ancestor: &Hash, descendant: &Hash) -> Result<bool, StorageError> {
        self.is_descendant(ancestor, descendant)
    }

    fn subchain(&self, start: &Hash, end: &Hash) -> Result<Vec<Hash>, StorageError> {
        self.subchain_between(start, end)
    }

    fn get_block_body(&self, hash: &Hash) -> Result<Body, StorageError> {
        self.body(hash)
    }

    fn get_receipt(&self, hash: &Hash) -> Result<Vec<u8>, StorageError> {
        Self::extra(&self.index.read().receipts, "receipt", hash)
    }

    fn get_message_queue(&self, hash: &Hash) -> Result<Vec<u8>, StorageError> {
        Self::extra(&self.index.read().message_queues, "message queue", hash)
    }

    fn get_justification(&self, hash: &Hash) -> Result<Vec<u8>, StorageError> {
        Self::extra(&self.index.read().justifications, "justification", hash)
    }
}
