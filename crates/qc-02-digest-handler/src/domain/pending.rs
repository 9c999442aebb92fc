//! Pending GRANDPA authority-set state.
//!
//! Four slots, each cleared by its own trigger:
//!
//! | Slot | Set by | Cleared on |
//! |------|--------|------------|
//! | scheduled | ScheduledChange | finalisation at or past `at_block` |
//! | forced | ForcedChange | import at or past `at_block`, or any finalisation |
//! | pause | Pause | finalisation at or past `at_block` |
//! | resume | Resume | import at or past `at_block` |

use shared_types::BlockNumber;

use super::digest::Authority;
use crate::error::{DigestError, DigestResult};

/// Returned by `next_change` when nothing is pending.
pub const NO_CHANGE_SCHEDULED: BlockNumber = BlockNumber::MAX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub authorities: Vec<Authority>,
    pub at_block: BlockNumber,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingChanges {
    pub scheduled: Option<PendingChange>,
    pub forced: Option<PendingChange>,
    pub pause: Option<BlockNumber>,
    pub resume: Option<BlockNumber>,
}

impl PendingChanges {
    /// Store a scheduled change. Returns false, leaving state untouched, if
    /// one is already pending.
    pub fn schedule(&mut self, change: PendingChange) -> bool {
        if self.scheduled.is_some() {
            return false;
        }
        self.scheduled = Some(change);
        true
    }

    /// Store a forced change. Only one may be pending.
    pub fn force(&mut self, change: PendingChange) -> DigestResult<()> {
        if self.forced.is_some() {
            return Err(DigestError::ForcedChangeAlreadyScheduled);
        }
        self.forced = Some(change);
        Ok(())
    }

    pub fn resume_due(&self, number: BlockNumber) -> bool {
        self.resume.is_some_and(|at| number >= at)
    }

    pub fn pause_due(&self, number: BlockNumber) -> bool {
        self.pause.is_some_and(|at| number >= at)
    }

    pub fn forced_due(&self, number: BlockNumber) -> bool {
        self.forced.as_ref().is_some_and(|c| number >= c.at_block)
    }

    pub fn scheduled_due(&self, number: BlockNumber) -> bool {
        self.scheduled.as_ref().is_some_and(|c| number >= c.at_block)
    }

    /// Earliest activation block across all slots.
    pub fn next_change(&self) -> BlockNumber {
        [
            self.scheduled.as_ref().map(|c| c.at_block),
            self.forced.as_ref().map(|c| c.at_block),
            self.pause,
            self.resume,
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(NO_CHANGE_SCHEDULED)
    }
}
