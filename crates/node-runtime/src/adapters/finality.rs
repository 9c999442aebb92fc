//! # Epoch and Authority State
//!
//! BABE epoch data and the GRANDPA authority set kept in memory.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use qc_02_digest_handler::{Authority, ConfigData, EpochData, EpochState, GrandpaState};
use shared_types::{BlockHeader, BlockNumber, StorageError};
use tracing::info;

/// Epoch data by epoch index. Epochs are fixed-length runs of blocks.
pub struct InMemoryEpochState {
    epoch_length: u64,
    epoch_data: RwLock<BTreeMap<u64, EpochData>>,
    config_data: RwLock<BTreeMap<u64, ConfigData>>,
}

impl InMemoryEpochState {
    pub fn new(epoch_length: u64) -> Self {
        Self {
            epoch_length: epoch_length.max(1),
            epoch_data: RwLock::new(BTreeMap::new()),
            config_data: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn epoch_data(&self, epoch: u64) -> Option<EpochData> {
        self.epoch_data.read().get(&epoch).cloned()
    }

    pub fn config_data(&self, epoch: u64) -> Option<ConfigData> {
        self.config_data.read().get(&epoch).cloned()
    }
}

impl EpochState for InMemoryEpochState {
    fn epoch_for_block(&self, header: &BlockHeader) -> Result<u64, StorageError> {
        Ok(header.number / self.epoch_length)
    }

    fn set_epoch_data(&self, epoch: u64, data: EpochData) -> Result<(), StorageError> {
        self.epoch_data.write().insert(epoch, data);
        Ok(())
    }

    fn set_config_data(&self, epoch: u64, data: ConfigData) -> Result<(), StorageError> {
        self.config_data.write().insert(epoch, data);
        Ok(())
    }
}

#[derive(Default)]
struct AuthoritySet {
    set_id: u64,
    next_change: Option<(Vec<Authority>, BlockNumber)>,
    next_pause: Option<BlockNumber>,
    next_resume: Option<BlockNumber>,
}

/// GRANDPA set id and the changes registered for it.
#[derive(Default)]
pub struct InMemoryGrandpaState {
    inner: RwLock<AuthoritySet>,
}

impl InMemoryGrandpaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_change(&self) -> Option<(Vec<Authority>, BlockNumber)> {
        self.inner.read().next_change.clone()
    }

    pub fn next_pause(&self) -> Option<BlockNumber> {
        self.inner.read().next_pause
    }

    pub fn next_resume(&self) -> Option<BlockNumber> {
        self.inner.read().next_resume
    }
}

impl GrandpaState for InMemoryGrandpaState {
    fn set_next_change(
        &self,
        authorities: Vec<Authority>,
        at_block: BlockNumber,
    ) -> Result<(), StorageError> {
        self.inner.write().next_change = Some((authorities, at_block));
        Ok(())
    }

    fn increment_set_id(&self) -> Result<u64, StorageError> {
        let mut inner = self.inner.write();
        inner.set_id += 1;
        info!(set_id = inner.set_id, "[grandpa] Authority set id incremented");
        Ok(inner.set_id)
    }

    fn current_set_id(&self) -> Result<u64, StorageError> {
        Ok(self.inner.read().set_id)
    }

    fn set_next_pause(&self, at_block: BlockNumber) -> Result<(), StorageError> {
        self.inner.write().next_pause = Some(at_block);
        Ok(())
    }

    fn set_next_resume(&self, at_block: BlockNumber) -> Result<(), StorageError> {
        self.inner.write().next_resume = Some(at_block);
        Ok(())
    }
}
