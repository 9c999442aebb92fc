//! Error types for the Block Import subsystem

use shared_types::{short_hex, Hash, StorageError};
use thiserror::Error;

/// Failures raised by a runtime instance or the runtime builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The runtime rejected a transaction.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// A runtime could not be built from the given code.
    #[error("Runtime instantiation failed: {0}")]
    Instantiation(String),

    /// Applying a runtime upgrade from block state failed.
    #[error("Runtime upgrade failed: {0}")]
    Upgrade(String),
}

/// Block import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// Malformed input handed to the coordinator
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Parent is not indexed yet; the caller may retry later
    #[error("Parent block not found: {}", short_hex(.0))]
    ParentNotFound(Hash),

    /// Storage or index failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Runtime lookup, upgrade or validation failure
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// A code substitute decoded to zero bytes
    #[error("Empty runtime code for substitute at {}", short_hex(.0))]
    EmptyRuntimeCode(Hash),

    /// A configured code substitute could not be parsed
    #[error("Invalid code substitute {key}: {reason}")]
    InvalidCodeSubstitute { key: String, reason: String },

    /// The transaction pool refused a revalidated transaction
    #[error("Transaction pool rejected extrinsic: {0}")]
    PoolRejected(String),
}

impl ImportError {
    /// True for errors that mean "not ready yet" rather than "bad block".
    pub fn is_not_ready(&self) -> bool {
        matches!(self, ImportError::ParentNotFound(_))
    }
}

/// Result type for block import operations
pub type ImportResult<T> = Result<T, ImportError>;
