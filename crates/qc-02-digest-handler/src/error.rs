//! Error types for the Digest Handler subsystem

use shared_types::{ConsensusEngineId, StorageError};
use thiserror::Error;

fn engine_name(engine: &ConsensusEngineId) -> String {
    String::from_utf8_lossy(engine).into_owned()
}

/// Digest handling errors
#[derive(Debug, Error)]
pub enum DigestError {
    /// Consensus digest for an engine this node does not run
    #[error("Unknown consensus engine id: {}", engine_name(.0))]
    UnknownEngine(ConsensusEngineId),

    /// Leading variant byte is not a known digest for the engine
    #[error("Unrecognized {} digest variant {index}", engine_name(.engine))]
    UnrecognizedDigest {
        engine: ConsensusEngineId,
        index: u8,
    },

    /// Payload did not decode
    #[error("Failed to decode digest payload: {0}")]
    Decode(#[from] parity_scale_codec::Error),

    /// A forced change is already pending
    #[error("already have forced change scheduled")]
    ForcedChangeAlreadyScheduled,

    /// Collaborator failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for digest operations
pub type DigestResult<T> = Result<T, DigestError>;
