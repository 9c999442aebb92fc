//! Error types for the Chain Sync subsystem

use shared_types::{short_hex, BlockNumber, Hash, StorageError};
use thiserror::Error;

/// Chain sync errors
#[derive(Debug, Error)]
pub enum SyncError {
    /// The requested start block is not known locally
    #[error("Unknown start block: {}", short_hex(.0))]
    UnknownStartBlock(Hash),

    /// The requested end block is not known locally
    #[error("Unknown end block: {}", short_hex(.0))]
    UnknownEndBlock(Hash),

    /// Descending request whose start does not descend from its end
    #[error("request start hash is not descendant of end hash")]
    StartNotDescendantOfEnd,

    /// Ascending request whose end does not descend from its start
    #[error("request end hash is not descendant of start hash")]
    EndNotDescendantOfStart,

    /// No block at the start number descends from the end hash
    #[error("No block at number {number} descends from end block {}", short_hex(.end))]
    NoMatchingFork { number: BlockNumber, end: Hash },

    /// Collaborator failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SyncError {
    /// True when the peer asked for blocks we do not have.
    pub fn is_unknown_block(&self) -> bool {
        matches!(
            self,
            SyncError::UnknownStartBlock(_) | SyncError::UnknownEndBlock(_)
        )
    }
}

/// Result type for chain sync operations
pub type SyncResult<T> = Result<T, SyncError>;
