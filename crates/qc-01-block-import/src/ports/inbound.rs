//! Driving Ports (API - Inbound)

use shared_types::{Block, TrieState};

use crate::error::ImportResult;

/// Block Import API
///
/// Both calls apply one block to chain state. The apply step runs for one
/// block at a time; concurrent callers are serialized.
pub trait BlockImportApi: Send + Sync {
    /// Commit `state`, index `block`, handle its digests and runtime changes.
    fn handle_block(&self, block: Block, state: TrieState) -> ImportResult<()>;

    /// As `handle_block`, then gossip a best-block announcement.
    fn handle_block_produced(&self, block: Block, state: TrieState) -> ImportResult<()>;
}
