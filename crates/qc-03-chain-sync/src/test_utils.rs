//! In-memory chain for unit tests.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use shared_types::{
    BlockHeader, BlockNumber, Body, Digest, Extrinsic, Hash, StorageError, ZERO_HASH,
};

use crate::ports::outbound::BlockState;

/// Block tree with a canonical chain and optional forks. Every block stores
/// a body, receipt, message queue and justification unless removed.
#[derive(Default)]
pub struct MockChain {
    headers: RwLock<HashMap<Hash, BlockHeader>>,
    canonical: RwLock<Vec<Hash>>,
    bodies: RwLock<HashMap<Hash, Body>>,
    extras: RwLock<HashMap<Hash, Vec<u8>>>,
    /// Numbers whose canonical header lookup fails.
    pruned: RwLock<HashSet<BlockNumber>>,
}

impl MockChain {
    /// Genesis plus `length` canonical blocks.
    pub fn with_canonical(length: u64) -> Self {
        let chain = Self::default();
        let mut parent = chain.insert(ZERO_HASH, 0, 0);
        chain.canonical.write().push(parent);
        for number in 1..=length {
            parent = chain.insert(parent, number, 0);
            chain.canonical.write().push(parent);
        }
        chain
    }

    /// Non-canonical branch of `length` blocks on top of canonical
    /// `from_number`. Returns the branch hashes, lowest first.
    pub fn add_fork(&self, from_number: BlockNumber, length: u64, salt: u8) -> Vec<Hash> {
        let mut parent = self.canonical_hash(from_number);
        let mut branch = Vec::new();
        for offset in 1..=length {
            parent = self.insert(parent, from_number + offset, salt);
            branch.push(parent);
        }
        branch
    }

    pub fn canonical_hash(&self, number: BlockNumber) -> Hash {
        self.canonical.read()[number as usize]
    }

    pub fn header(&self, hash: &Hash) -> BlockHeader {
        self.headers.read()[hash].clone()
    }

    pub fn body(&self, hash: &Hash) -> Body {
        self.bodies.read()[hash].clone()
    }

    pub fn prune(&self, number: BlockNumber) {
        self.pruned.write().insert(number);
    }

    pub fn remove_body(&self, hash: &Hash) {
        self.bodies.write().remove(hash);
    }

    fn insert(&self, parent: Hash, number: BlockNumber, salt: u8) -> Hash {
        let header = BlockHeader::new(parent, number, [salt; 32], [0; 32], Digest::default());
        let hash = header.hash();
        self.headers.write().insert(hash, header);
        self.bodies
            .write()
            .insert(hash, vec![Extrinsic::new(number.to_le_bytes().to_vec())]);
        self.extras.write().insert(hash, vec![salt, number as u8]);
        hash
    }

    fn extra(&self, what: &'static str, hash: &Hash) -> Result<Vec<u8>, StorageError> {
        self.extras
            .read()
            .get(hash)
            .cloned()
            .ok_or(StorageError::DataNotFound { what, hash: *hash })
    }
}

impl BlockState for MockChain {
    fn best_block_number(&self) -> Result<BlockNumber, StorageError> {
        Ok(self.canonical.read().len() as u64 - 1)
    }

    fn get_header(&self, hash: &Hash) -> Result<BlockHeader, StorageError> {
        self.headers
            .read()
            .get(hash)
            .cloned()
            .ok_or(StorageError::BlockNotFound(*hash))
    }

    fn get_hash_by_number(&self, number: BlockNumber) -> Result<Hash, StorageError> {
        self.canonical
            .read()
            .get(number as usize)
            .copied()
            .ok_or(StorageError::NumberNotFound(number))
    }

    fn get_header_by_number(&self, number: BlockNumber) -> Result<BlockHeader, StorageError> {
        if self.pruned.read().contains(&number) {
            return Err(StorageError::NumberNotFound(number));
        }
        let hash = self.get_hash_by_number(number)?;
        self.get_header(&hash)
    }

    fn get_all_blocks_at_number(&self, number: BlockNumber) -> Result<Vec<Hash>, StorageError> {
        let mut hashes: Vec<Hash> = self
            .headers
            .read()
            .iter()
            .filter(|(_, header)| header.number == number)
            .map(|(hash, _)| *hash)
            .collect();
        let canonical = self.get_hash_by_number(number).ok();
        // Canonical first, the rest in a stable order.
        hashes.sort_by_key(|hash| (Some(*hash) != canonical, *hash));
        Ok(hashes)
    }

    fn is_descendant_of(&self, ancestor: &Hash, descendant: &Hash) -> Result<bool, StorageError> {
        let target = self.get_header(ancestor)?.number;
        let mut current = self.get_header(descendant)?;
        let mut hash = *descendant;
        while current.number > target {
            hash = current.parent_hash;
            current = self.get_header(&hash)?;
        }
        Ok(hash == *ancestor)
    }

    fn subchain(&self, start: &Hash, end: &Hash) -> Result<Vec<Hash>, StorageError> {
        let mut hashes = vec![*end];
        let mut current = *end;
        while current != *start {
            let header = self.get_header(&current)?;
            if header.number == 0 {
                return Err(StorageError::NoCommonAncestor(*start, *end));
            }
            current = header.parent_hash;
            hashes.push(current);
        }
        hashes.reverse();
        Ok(hashes)
    }

    fn get_block_body(&self, hash: &Hash) -> Result<Body, StorageError> {
        self.bodies
            .read()
            .get(hash)
            .cloned()
            .ok_or(StorageError::DataNotFound {
                what: "body",
                hash: *hash,
            })
    }

    fn get_receipt(&self, hash: &Hash) -> Result<Vec<u8>, StorageError> {
        self.extra("receipt", hash)
    }

    fn get_message_queue(&self, hash: &Hash) -> Result<Vec<u8>, StorageError> {
        self.extra("message queue", hash)
    }

    fn get_justification(&self, hash: &Hash) -> Result<Vec<u8>, StorageError> {
        self.extra("justification", hash)
    }
}
