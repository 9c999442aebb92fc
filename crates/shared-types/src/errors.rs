//! # Error Types
//!
//! Failures reported by the storage and block-index collaborators.

use thiserror::Error;

use crate::entities::{short_hex, BlockNumber, Hash};

/// Errors raised by block storage, the chain index and the runtime registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No block with this hash is indexed.
    #[error("Block not found: {}", short_hex(.0))]
    BlockNotFound(Hash),

    /// No canonical block at this number.
    #[error("No canonical block at number {0}")]
    NumberNotFound(BlockNumber),

    /// Parent of an inserted block is unknown.
    #[error("Parent block not found: {}", short_hex(.parent_hash))]
    ParentNotFound { parent_hash: Hash },

    /// The block is already indexed.
    #[error("Block already exists: {}", short_hex(.0))]
    BlockExists(Hash),

    /// The block is indexed but the requested component is absent.
    #[error("{what} not found for block {}", short_hex(.hash))]
    DataNotFound { what: &'static str, hash: Hash },

    /// No runtime instance is registered for this block.
    #[error("Runtime not found for block {}", short_hex(.0))]
    RuntimeNotFound(Hash),

    /// Neither block descends from the other's chain.
    #[error("No common ancestor between {} and {}", short_hex(.0), short_hex(.1))]
    NoCommonAncestor(Hash, Hash),

    /// Backend failure.
    #[error("Database error: {0}")]
    DatabaseError(String),
}
