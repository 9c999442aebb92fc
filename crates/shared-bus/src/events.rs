//! # Chain Events
//!
//! The two notification streams produced by block storage.

use shared_types::{Block, FinalisationInfo};

use crate::publisher::Notifier;

/// Which stream an event travels on. Used for log labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    BlockImported,
    BlockFinalised,
}

impl std::fmt::Display for EventTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventTopic::BlockImported => write!(f, "imported"),
            EventTopic::BlockFinalised => write!(f, "finalised"),
        }
    }
}

/// Notifier for blocks added to the index.
pub type ImportedNotifier = Notifier<Block>;

/// Notifier for finalised headers.
pub type FinalisedNotifier = Notifier<FinalisationInfo>;

impl ImportedNotifier {
    pub fn imported() -> Self {
        Notifier::new(EventTopic::BlockImported)
    }
}

impl FinalisedNotifier {
    pub fn finalised() -> Self {
        Notifier::new(EventTopic::BlockFinalised)
    }
}
