//! # Gossip Sink
//!
//! Keeps the most recent block announcements for peers to pick up.

use std::collections::VecDeque;

use parking_lot::RwLock;
use qc_01_block_import::{BlockAnnounceMessage, Network};
use shared_types::short_hex;
use tracing::info;

pub const DEFAULT_ANNOUNCEMENT_CAPACITY: usize = 64;

pub struct GossipRecorder {
    capacity: usize,
    announcements: RwLock<VecDeque<BlockAnnounceMessage>>,
}

impl Default for GossipRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOUNCEMENT_CAPACITY)
    }
}

impl GossipRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            announcements: RwLock::new(VecDeque::new()),
        }
    }

    /// Announcements, oldest first.
    pub fn announcements(&self) -> Vec<BlockAnnounceMessage> {
        self.announcements.read().iter().cloned().collect()
    }
}

impl Network for GossipRecorder {
    fn gossip_message(&self, message: BlockAnnounceMessage) {
        info!(
            number = message.number,
            hash = %short_hex(&message.header().hash()),
            best = message.best_block,
            "[network] Gossiping block announcement"
        );
        let mut announcements = self.announcements.write();
        if announcements.len() == self.capacity {
            announcements.pop_front();
        }
        announcements.push_back(message);
    }
}
