//! Driven Ports (SPI - Outbound Dependencies)

use shared_types::{BlockHeader, BlockNumber, Body, Hash, StorageError};

/// Read access to the block index and block storage.
pub trait BlockState: Send + Sync {
    fn best_block_number(&self) -> Result<BlockNumber, StorageError>;

    fn get_header(&self, hash: &Hash) -> Result<BlockHeader, StorageError>;

    /// Canonical hash at `number`.
    fn get_hash_by_number(&self, number: BlockNumber) -> Result<Hash, StorageError>;

    /// Canonical header at `number`.
    fn get_header_by_number(&self, number: BlockNumber) -> Result<BlockHeader, StorageError>;

    /// Every known block at `number`, across forks.
    fn get_all_blocks_at_number(&self, number: BlockNumber) -> Result<Vec<Hash>, StorageError>;

    /// True if `descendant` is `ancestor` or built on it.
    fn is_descendant_of(&self, ancestor: &Hash, descendant: &Hash) -> Result<bool, StorageError>;

    /// Hashes from `start` to `end` inclusive, ascending. `start` must be an
    /// ancestor of `end`.
    fn subchain(&self, start: &Hash, end: &Hash) -> Result<Vec<Hash>, StorageError>;

    fn get_block_body(&self, hash: &Hash) -> Result<Body, StorageError>;

    fn get_receipt(&self, hash: &Hash) -> Result<Vec<u8>, StorageError>;

    fn get_message_queue(&self, hash: &Hash) -> Result<Vec<u8>, StorageError>;

    fn get_justification(&self, hash: &Hash) -> Result<Vec<u8>, StorageError>;
}
