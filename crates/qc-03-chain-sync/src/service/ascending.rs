//! Ascending requests: from the start block towards the head.

use shared_types::{short_hex, BlockNumber, Hash};
use tracing::debug;

use super::ChainSyncService;
use crate::domain::{BlockRequest, BlockResponse, FromBlock};
use crate::error::{SyncError, SyncResult};

impl ChainSyncService {
    pub(crate) fn handle_ascending(&self, request: &BlockRequest) -> SyncResult<BlockResponse> {
        let max = self.max_items(request.max);
        let best = self.block_state.best_block_number()?;

        let (start_number, start_hash) = match request.start {
            FromBlock::Number(number) => (number.max(1).min(best), None),
            FromBlock::Hash(hash) => {
                let header = self
                    .block_state
                    .get_header(&hash)
                    .map_err(|_| SyncError::UnknownStartBlock(hash))?;
                (header.number, Some(hash))
            }
        };

        if let Some(end) = request.end_hash {
            self.block_state
                .get_header(&end)
                .map_err(|_| SyncError::UnknownEndBlock(end))?;
            let start = match start_hash {
                Some(hash) => hash,
                None => self.block_state.get_hash_by_number(start_number)?,
            };
            if !self.block_state.is_descendant_of(&start, &end)? {
                return Err(SyncError::EndNotDescendantOfStart);
            }
            let mut hashes = self.block_state.subchain(&start, &end)?;
            hashes.truncate(max as usize);
            return Ok(self.respond(hashes, request.requested_data));
        }

        if let Some(hash) = start_hash {
            if self.block_state.get_hash_by_number(start_number).ok() != Some(hash) {
                let hashes = self.ascending_by_child(hash, start_number, max)?;
                return Ok(self.respond(hashes, request.requested_data));
            }
        }

        if max == 0 || start_number > best {
            return Ok(BlockResponse::default());
        }
        let last: BlockNumber = start_number
            .saturating_add(u64::from(max) - 1)
            .min(best);

        let hashes = (start_number..=last)
            .map(|number| self.block_state.get_hash_by_number(number))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.respond(hashes, request.requested_data))
    }

    /// Follow a non-canonical start forward along its own branch, taking at
    /// each height the first block whose parent is the previous hash.
    fn ascending_by_child(
        &self,
        start: Hash,
        start_number: BlockNumber,
        max: u32,
    ) -> SyncResult<Vec<Hash>> {
        let mut hashes = Vec::new();
        if max == 0 {
            return Ok(hashes);
        }
        hashes.push(start);

        let mut parent = start;
        let mut number = start_number;
        while hashes.len() < max as usize {
            number = number.saturating_add(1);
            let mut next = None;
            for candidate in self.block_state.get_all_blocks_at_number(number)? {
                if self.block_state.get_header(&candidate)?.parent_hash == parent {
                    next = Some(candidate);
                    break;
                }
            }
            let Some(child) = next else { break };
            hashes.push(child);
            parent = child;
        }

        debug!(
            start = %short_hex(&start),
            count = hashes.len(),
            "[qc-03] Ascending request followed a side branch"
        );
        Ok(hashes)
    }
}
