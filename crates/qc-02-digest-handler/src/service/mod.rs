//! # Digest Handler Service
//!
//! Decodes consensus digests and tracks pending GRANDPA changes. The four
//! pending slots sit behind one lock because both notification loops
//! mutate them.

mod notifications;

use std::sync::Arc;

use parking_lot::Mutex;
use shared_bus::NotifierChannel;
use shared_types::{short_hex, Block, BlockHeader, BlockNumber, FinalisationInfo};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::DigestHandlerConfig;
use crate::domain::{
    BabeConsensusDigest, ConsensusDigest, GrandpaChange, GrandpaConsensusDigest, PendingChange,
    PendingChanges,
};
use crate::error::DigestResult;
use crate::ports::inbound::DigestHandlerApi;
use crate::ports::outbound::{BlockState, EpochState, GrandpaState};

/// Dependencies for DigestHandlerService
pub struct DigestHandlerDependencies {
    pub block_state: Arc<dyn BlockState>,
    pub epoch_state: Arc<dyn EpochState>,
    pub grandpa_state: Arc<dyn GrandpaState>,
}

/// The Consensus Digest Handler.
pub struct DigestHandlerService {
    pub(crate) block_state: Arc<dyn BlockState>,
    pub(crate) epoch_state: Arc<dyn EpochState>,
    pub(crate) grandpa_state: Arc<dyn GrandpaState>,
    pub(crate) pending: Mutex<PendingChanges>,
    pub(crate) imported: Mutex<Option<NotifierChannel<Block>>>,
    pub(crate) finalised: Mutex<Option<NotifierChannel<FinalisationInfo>>>,
    pub(crate) shutdown: watch::Receiver<bool>,
}

impl DigestHandlerService {
    /// Create the handler and register its import and finalisation channels.
    pub fn new(
        deps: DigestHandlerDependencies,
        config: DigestHandlerConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let imported = deps
            .block_state
            .register_imported_channel(config.notifier_buffer);
        let finalised = deps
            .block_state
            .register_finalised_channel(config.notifier_buffer);
        Self {
            block_state: deps.block_state,
            epoch_state: deps.epoch_state,
            grandpa_state: deps.grandpa_state,
            pending: Mutex::new(PendingChanges::default()),
            imported: Mutex::new(Some(imported)),
            finalised: Mutex::new(Some(finalised)),
            shutdown,
        }
    }

    /// Snapshot of the pending slots.
    pub fn pending_changes(&self) -> PendingChanges {
        self.pending.lock().clone()
    }

    fn handle_consensus_digest(
        &self,
        digest: ConsensusDigest,
        header: &BlockHeader,
    ) -> DigestResult<()> {
        match digest {
            ConsensusDigest::Grandpa(digest) => self.handle_grandpa_digest(digest, header),
            ConsensusDigest::Babe(digest) => self.handle_babe_digest(digest, header),
        }
    }

    fn handle_grandpa_digest(
        &self,
        digest: GrandpaConsensusDigest,
        header: &BlockHeader,
    ) -> DigestResult<()> {
        match digest {
            GrandpaConsensusDigest::ScheduledChange(change) => {
                self.handle_scheduled_change(change, header)
            }
            GrandpaConsensusDigest::ForcedChange(change) => {
                self.handle_forced_change(change, header)
            }
            GrandpaConsensusDigest::OnDisabled(_) => Ok(()),
            GrandpaConsensusDigest::Pause(delay) => {
                let at_block = self.best_number()?.saturating_add(u64::from(delay));
                self.pending.lock().pause = Some(at_block);
                self.grandpa_state.set_next_pause(at_block)?;
                info!(at_block, "[qc-02] GRANDPA pause scheduled");
                Ok(())
            }
            GrandpaConsensusDigest::Resume(delay) => {
                let at_block = self.best_number()?.saturating_add(u64::from(delay));
                self.pending.lock().resume = Some(at_block);
                self.grandpa_state.set_next_resume(at_block)?;
                info!(at_block, "[qc-02] GRANDPA resume scheduled");
                Ok(())
            }
        }
    }

    /// Tracked from the best block; registered from the digest's own header.
    fn handle_scheduled_change(
        &self,
        change: GrandpaChange,
        header: &BlockHeader,
    ) -> DigestResult<()> {
        let best = self.best_number()?;
        let delay = u64::from(change.delay);
        let tracked = PendingChange {
            authorities: change.authorities.clone(),
            at_block: best.saturating_add(delay),
        };
        if !self.pending.lock().schedule(tracked) {
            debug!(number = header.number, "[qc-02] Scheduled change already pending, ignoring");
            return Ok(());
        }
        let register_at = header.number.saturating_add(delay);
        self.grandpa_state
            .set_next_change(change.authorities, register_at)?;
        info!(register_at, "[qc-02] GRANDPA scheduled change registered");
        Ok(())
    }

    fn handle_forced_change(
        &self,
        change: GrandpaChange,
        header: &BlockHeader,
    ) -> DigestResult<()> {
        let at_block = header.number.saturating_add(u64::from(change.delay));
        self.pending.lock().force(PendingChange {
            authorities: change.authorities.clone(),
            at_block,
        })?;
        self.grandpa_state
            .set_next_change(change.authorities, at_block)?;
        info!(at_block, "[qc-02] GRANDPA forced change registered");
        Ok(())
    }

    fn handle_babe_digest(
        &self,
        digest: BabeConsensusDigest,
        header: &BlockHeader,
    ) -> DigestResult<()> {
        match digest {
            BabeConsensusDigest::NextEpochData(data) => {
                let epoch = self.epoch_state.epoch_for_block(header)? + 1;
                self.epoch_state.set_epoch_data(epoch, data)?;
                debug!(epoch, "[qc-02] Stored next BABE epoch data");
                Ok(())
            }
            BabeConsensusDigest::OnDisabled(authority_index) => {
                debug!(authority_index, number = header.number, "[qc-02] BABE authority disabled");
                Ok(())
            }
            BabeConsensusDigest::NextConfigData(data) => {
                let epoch = self.epoch_state.epoch_for_block(header)? + 1;
                self.epoch_state.set_config_data(epoch, data)?;
                debug!(epoch, "[qc-02] Stored next BABE config data");
                Ok(())
            }
        }
    }

    fn best_number(&self) -> DigestResult<BlockNumber> {
        Ok(self.block_state.best_block_header()?.number)
    }
}

impl DigestHandlerApi for DigestHandlerService {
    fn handle_digests(&self, header: &BlockHeader) {
        for (index, item) in header.digest.iter().enumerate() {
            let Some((engine, payload)) = item.as_consensus() else {
                continue;
            };
            let result = ConsensusDigest::from_parts(engine, payload)
                .and_then(|digest| self.handle_consensus_digest(digest, header));
            if let Err(e) = result {
                error!(
                    number = header.number,
                    hash = %short_hex(&header.hash()),
                    index,
                    error = %e,
                    "[qc-02] Cannot handle digest"
                );
            }
        }
    }

    fn next_grandpa_authority_change(&self) -> BlockNumber {
        self.pending.lock().next_change()
    }

    fn current_set_id(&self) -> DigestResult<u64> {
        Ok(self.grandpa_state.current_set_id()?)
    }
}
