//! # Chain Sync Service
//!
//! Stateless builder of block responses. Each request resolves its range
//! against the local chain and returns at most the configured maximum of
//! blocks.

mod ascending;
mod descending;

use std::sync::Arc;

use shared_types::{short_hex, Hash, StorageError};
use tracing::debug;

use crate::config::ChainSyncConfig;
use crate::domain::{BlockData, BlockRequest, BlockResponse, Direction, RequestedData};
use crate::error::SyncResult;
use crate::ports::inbound::ChainSyncApi;
use crate::ports::outbound::BlockState;

/// The Chain Sync Response Builder.
pub struct ChainSyncService {
    pub(crate) block_state: Arc<dyn BlockState>,
    pub(crate) config: ChainSyncConfig,
}

impl ChainSyncService {
    pub fn new(block_state: Arc<dyn BlockState>, config: ChainSyncConfig) -> Self {
        Self {
            block_state,
            config,
        }
    }

    /// Requested maximum, capped by config and protocol.
    pub(crate) fn max_items(&self, requested: Option<u32>) -> u32 {
        let cap = self.config.effective_max();
        requested.map_or(cap, |max| max.min(cap))
    }

    pub(crate) fn respond(&self, hashes: Vec<Hash>, requested: RequestedData) -> BlockResponse {
        BlockResponse {
            blocks: hashes
                .into_iter()
                .map(|hash| self.block_data(hash, requested))
                .collect(),
        }
    }

    /// Fill the requested components of one block. A missing component
    /// stays `None`.
    fn block_data(&self, hash: Hash, requested: RequestedData) -> BlockData {
        let mut data = BlockData::new(hash);
        if requested.is_empty() {
            return data;
        }
        let state = self.block_state.as_ref();

        if requested.contains(RequestedData::HEADER) {
            data.header = component("header", &hash, state.get_header(&hash));
        }
        if requested.contains(RequestedData::BODY) {
            data.body = component("body", &hash, state.get_block_body(&hash));
        }
        if requested.contains(RequestedData::RECEIPT) {
            data.receipt = component("receipt", &hash, state.get_receipt(&hash));
        }
        if requested.contains(RequestedData::MESSAGE_QUEUE) {
            data.message_queue = component("message queue", &hash, state.get_message_queue(&hash));
        }
        if requested.contains(RequestedData::JUSTIFICATION) {
            data.justification = component("justification", &hash, state.get_justification(&hash));
        }
        data
    }
}

fn component<T>(what: &'static str, hash: &Hash, result: Result<T, StorageError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(hash = %short_hex(hash), error = %e, "[qc-03] Failed to get {} for block", what);
            None
        }
    }
}

impl ChainSyncApi for ChainSyncService {
    fn build_response(&self, request: &BlockRequest) -> SyncResult<BlockResponse> {
        let response = match request.direction {
            Direction::Ascending => self.handle_ascending(request)?,
            Direction::Descending => self.handle_descending(request)?,
        };
        debug!(
            direction = ?request.direction,
            blocks = response.blocks.len(),
            "[qc-03] Built block response"
        );
        Ok(response)
    }
}
