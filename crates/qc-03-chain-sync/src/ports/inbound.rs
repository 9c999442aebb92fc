//! Driving Ports (API - Inbound)

use crate::domain::{BlockRequest, BlockResponse};
use crate::error::SyncResult;

/// Chain Sync API
pub trait ChainSyncApi: Send + Sync {
    /// Resolve the requested range and assemble a bounded response.
    fn build_response(&self, request: &BlockRequest) -> SyncResult<BlockResponse>;
}
