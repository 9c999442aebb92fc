//! Descending requests: from the start block towards genesis.

use shared_types::{short_hex, BlockNumber, Hash};
use tracing::debug;

use super::ChainSyncService;
use crate::domain::{BlockRequest, BlockResponse, FromBlock, RequestedData};
use crate::error::{SyncError, SyncResult};

impl ChainSyncService {
    pub(crate) fn handle_descending(&self, request: &BlockRequest) -> SyncResult<BlockResponse> {
        let max = self.max_items(request.max);

        let (start_number, mut start_hash) = match request.start {
            FromBlock::Number(number) => {
                let best = self.block_state.best_block_number()?;
                // Genesis has nothing below it to walk.
                (number.max(1).min(best), None)
            }
            FromBlock::Hash(hash) => {
                let header = self
                    .block_state
                    .get_header(&hash)
                    .map_err(|_| SyncError::UnknownStartBlock(hash))?;
                (header.number, Some(hash))
            }
        };

        let mut end_hash = request.end_hash;
        let mut end_number: BlockNumber = 0;

        match request.end_hash {
            Some(end) => {
                self.block_state
                    .get_header(&end)
                    .map_err(|_| SyncError::UnknownEndBlock(end))?;
                match start_hash {
                    Some(start) => {
                        if !self.block_state.is_descendant_of(&end, &start)? {
                            return Err(SyncError::StartNotDescendantOfEnd);
                        }
                    }
                    None => start_hash = Some(self.fork_start(start_number, &end)?),
                }
            }
            None => {
                end_number = start_number.saturating_sub(u64::from(max) + 1);
                match self.block_state.get_header_by_number(end_number) {
                    Ok(header) => end_hash = Some(header.hash()),
                    Err(e) => {
                        debug!(end_number, error = %e, "[qc-03] End header unavailable, walking by number");
                    }
                }
            }
        }

        debug!(
            start_number,
            end_number,
            max,
            start = ?start_hash.as_ref().map(short_hex),
            end = ?end_hash.as_ref().map(short_hex),
            "[qc-03] Handling descending request"
        );

        match (start_hash, end_hash) {
            (None, None) => {
                self.descending_by_number(start_number, end_number, max, request.requested_data)
            }
            (Some(start), None) => {
                self.descending_by_parent(start, end_number, max, request.requested_data)
            }
            (start, Some(end)) => {
                let start = match start {
                    Some(hash) => hash,
                    None => self.block_state.get_hash_by_number(start_number)?,
                };
                self.descending_by_hash(start, end, max, request.requested_data)
            }
        }
    }

    /// Block at `number` that descends from `end`: canonical first, then
    /// any fork.
    fn fork_start(&self, number: BlockNumber, end: &Hash) -> SyncResult<Hash> {
        let canonical = self.block_state.get_hash_by_number(number)?;
        if self.block_state.is_descendant_of(end, &canonical)? {
            return Ok(canonical);
        }
        let candidates = self.block_state.get_all_blocks_at_number(number)?;
        candidates
            .into_iter()
            .find(|hash| {
                self.block_state
                    .is_descendant_of(end, hash)
                    .unwrap_or(false)
            })
            .ok_or(SyncError::NoMatchingFork { number, end: *end })
    }

    /// Canonical blocks `start` down to `end + 1`.
    fn descending_by_number(
        &self,
        start: BlockNumber,
        end: BlockNumber,
        max: u32,
        requested: RequestedData,
    ) -> SyncResult<BlockResponse> {
        let mut hashes = Vec::new();
        for number in (end.saturating_add(1)..=start).rev().take(max as usize) {
            hashes.push(self.block_state.get_hash_by_number(number)?);
        }
        Ok(self.respond(hashes, requested))
    }

    /// Follow parent links from `start` down to `end + 1`.
    fn descending_by_parent(
        &self,
        start: Hash,
        end: BlockNumber,
        max: u32,
        requested: RequestedData,
    ) -> SyncResult<BlockResponse> {
        let mut hashes = Vec::new();
        let mut current = start;
        while hashes.len() < max as usize {
            let header = self.block_state.get_header(&current)?;
            if header.number <= end {
                break;
            }
            hashes.push(current);
            if header.number == 0 {
                break;
            }
            current = header.parent_hash;
        }
        Ok(self.respond(hashes, requested))
    }

    /// The chain from `start` down to `end` inclusive, truncated to `max`.
    fn descending_by_hash(
        &self,
        start: Hash,
        end: Hash,
        max: u32,
        requested: RequestedData,
    ) -> SyncResult<BlockResponse> {
        let mut hashes = self.block_state.subchain(&end, &start)?;
        hashes.reverse();
        hashes.truncate(max as usize);
        Ok(self.respond(hashes, requested))
    }
}
