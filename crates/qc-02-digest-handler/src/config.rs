//! Digest handler configuration

use serde::{Deserialize, Serialize};

/// Configuration for the digest handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestHandlerConfig {
    /// Buffer of each notification channel registered with block storage.
    ///
    /// Storage never waits on a full channel; the event is dropped and
    /// counted in the notifier's `events_dropped`. A lost finalisation leaves
    /// a forced change pending until the next finalisation arrives, so size
    /// this above the longest expected stall of the handler loops.
    pub notifier_buffer: usize,
}

impl Default for DigestHandlerConfig {
    fn default() -> Self {
        Self {
            notifier_buffer: shared_bus::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl DigestHandlerConfig {
    /// Small buffers for tests.
    pub fn for_testing() -> Self {
        Self { notifier_buffer: 16 }
    }
}
