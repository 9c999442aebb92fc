//! Driving Ports (API - Inbound)

use shared_types::{BlockHeader, BlockNumber};

use crate::error::DigestResult;

/// Digest Handler API
pub trait DigestHandlerApi: Send + Sync {
    /// Decode and apply every consensus digest in `header`. Per-digest
    /// failures are logged and do not stop the remaining digests.
    fn handle_digests(&self, header: &BlockHeader);

    /// Earliest block at which a pending GRANDPA change activates, or
    /// `NO_CHANGE_SCHEDULED`.
    fn next_grandpa_authority_change(&self) -> BlockNumber;

    /// Current GRANDPA authority set id.
    fn current_set_id(&self) -> DigestResult<u64>;
}
