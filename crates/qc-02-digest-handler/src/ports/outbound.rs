//! Driven Ports (SPI - Outbound Dependencies)

use shared_bus::{NotifierChannel, NotifierId};
use shared_types::{Block, BlockHeader, BlockNumber, FinalisationInfo, StorageError};

use crate::domain::{Authority, ConfigData, EpochData};

/// Chain head and block notifications.
pub trait BlockState: Send + Sync {
    fn best_block_header(&self) -> Result<BlockHeader, StorageError>;

    fn register_imported_channel(&self, buffer: usize) -> NotifierChannel<Block>;

    fn free_imported_channel(&self, id: NotifierId);

    fn register_finalised_channel(&self, buffer: usize) -> NotifierChannel<FinalisationInfo>;

    fn free_finalised_channel(&self, id: NotifierId);
}

/// BABE epoch storage.
pub trait EpochState: Send + Sync {
    /// Epoch containing `header`.
    fn epoch_for_block(&self, header: &BlockHeader) -> Result<u64, StorageError>;

    fn set_epoch_data(&self, epoch: u64, data: EpochData) -> Result<(), StorageError>;

    fn set_config_data(&self, epoch: u64, data: ConfigData) -> Result<(), StorageError>;
}

/// GRANDPA authority-set storage.
pub trait GrandpaState: Send + Sync {
    /// Register the next authority set, effective at `at_block`.
    fn set_next_change(
        &self,
        authorities: Vec<Authority>,
        at_block: BlockNumber,
    ) -> Result<(), StorageError>;

    /// Bump the set id; returns the new id.
    fn increment_set_id(&self) -> Result<u64, StorageError>;

    fn current_set_id(&self) -> Result<u64, StorageError>;

    fn set_next_pause(&self, at_block: BlockNumber) -> Result<(), StorageError>;

    fn set_next_resume(&self, at_block: BlockNumber) -> Result<(), StorageError>;
}
