//! Mock collaborators for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use shared_bus::{FinalisedNotifier, ImportedNotifier, NotifierChannel, NotifierId};
use shared_types::{
    Block, BlockHeader, BlockNumber, Digest, DigestItem, FinalisationInfo, StorageError,
    ZERO_HASH,
};
use tokio::sync::watch;

use crate::config::DigestHandlerConfig;
use crate::domain::{Authority, ConfigData, EpochData};
use crate::ports::outbound::{BlockState, EpochState, GrandpaState};
use crate::service::{DigestHandlerDependencies, DigestHandlerService};

pub fn header_at(number: BlockNumber, logs: Vec<DigestItem>) -> BlockHeader {
    BlockHeader::new(ZERO_HASH, number, [0; 32], [0; 32], Digest::new(logs))
}

pub struct MockBlockState {
    pub best_number: Mutex<BlockNumber>,
    pub imported: ImportedNotifier,
    pub finalised: FinalisedNotifier,
    pub freed_imported: Mutex<Vec<NotifierId>>,
    pub freed_finalised: Mutex<Vec<NotifierId>>,
}

impl MockBlockState {
    pub fn new(best_number: BlockNumber) -> Self {
        Self {
            best_number: Mutex::new(best_number),
            imported: ImportedNotifier::imported(),
            finalised: FinalisedNotifier::finalised(),
            freed_imported: Mutex::new(Vec::new()),
            freed_finalised: Mutex::new(Vec::new()),
        }
    }

    pub fn import(&self, number: BlockNumber) {
        self.imported
            .notify(&Block::new(header_at(number, vec![]), vec![]));
    }

    pub fn finalise(&self, number: BlockNumber) {
        self.finalised.notify(&FinalisationInfo {
            header: header_at(number, vec![]),
            round: 1,
            set_id: 0,
        });
    }
}

impl BlockState for MockBlockState {
    fn best_block_header(&self) -> Result<BlockHeader, StorageError> {
        Ok(header_at(*self.best_number.lock(), vec![]))
    }

    fn register_imported_channel(&self, buffer: usize) -> NotifierChannel<Block> {
        self.imported.register(buffer)
    }

    fn free_imported_channel(&self, id: NotifierId) {
        let _ = self.imported.free(id);
        self.freed_imported.lock().push(id);
    }

    fn register_finalised_channel(&self, buffer: usize) -> NotifierChannel<FinalisationInfo> {
        self.finalised.register(buffer)
    }

    fn free_finalised_channel(&self, id: NotifierId) {
        let _ = self.finalised.free(id);
        self.freed_finalised.lock().push(id);
    }
}

#[derive(Default)]
pub struct MockEpochState {
    pub epoch: Mutex<u64>,
    pub epoch_data: Mutex<HashMap<u64, EpochData>>,
    pub config_data: Mutex<HashMap<u64, ConfigData>>,
}

impl EpochState for MockEpochState {
    fn epoch_for_block(&self, _header: &BlockHeader) -> Result<u64, StorageError> {
        Ok(*self.epoch.lock())
    }

    fn set_epoch_data(&self, epoch: u64, data: EpochData) -> Result<(), StorageError> {
        self.epoch_data.lock().insert(epoch, data);
        Ok(())
    }

    fn set_config_data(&self, epoch: u64, data: ConfigData) -> Result<(), StorageError> {
        self.config_data.lock().insert(epoch, data);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockGrandpaState {
    pub set_id: Mutex<u64>,
    pub next_changes: Mutex<Vec<(Vec<Authority>, BlockNumber)>>,
    pub pauses: Mutex<Vec<BlockNumber>>,
    pub resumes: Mutex<Vec<BlockNumber>>,
    pub fail_increment: AtomicBool,
}

impl GrandpaState for MockGrandpaState {
    fn set_next_change(
        &self,
        authorities: Vec<Authority>,
        at_block: BlockNumber,
    ) -> Result<(), StorageError> {
        self.next_changes.lock().push((authorities, at_block));
        Ok(())
    }

    fn increment_set_id(&self) -> Result<u64, StorageError> {
        if self.fail_increment.load(Ordering::SeqCst) {
            return Err(StorageError::DatabaseError("set id".into()));
        }
        let mut set_id = self.set_id.lock();
        *set_id += 1;
        Ok(*set_id)
    }

    fn current_set_id(&self) -> Result<u64, StorageError> {
        Ok(*self.set_id.lock())
    }

    fn set_next_pause(&self, at_block: BlockNumber) -> Result<(), StorageError> {
        self.pauses.lock().push(at_block);
        Ok(())
    }

    fn set_next_resume(&self, at_block: BlockNumber) -> Result<(), StorageError> {
        self.resumes.lock().push(at_block);
        Ok(())
    }
}

pub struct TestContext {
    pub service: Arc<DigestHandlerService>,
    pub blocks: Arc<MockBlockState>,
    pub epochs: Arc<MockEpochState>,
    pub grandpa: Arc<MockGrandpaState>,
    pub shutdown_tx: watch::Sender<bool>,
}

impl TestContext {
    pub fn new(best_number: BlockNumber) -> Self {
        let blocks = Arc::new(MockBlockState::new(best_number));
        let epochs = Arc::new(MockEpochState::default());
        let grandpa = Arc::new(MockGrandpaState::default());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let deps = DigestHandlerDependencies {
            block_state: blocks.clone(),
            epoch_state: epochs.clone(),
            grandpa_state: grandpa.clone(),
        };
        let service = Arc::new(DigestHandlerService::new(
            deps,
            DigestHandlerConfig::for_testing(),
            shutdown_rx,
        ));
        Self {
            service,
            blocks,
            epochs,
            grandpa,
            shutdown_tx,
        }
    }
}
