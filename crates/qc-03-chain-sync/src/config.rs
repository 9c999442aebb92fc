//! Chain sync configuration

use serde::{Deserialize, Serialize};

use crate::domain::MAX_RESPONSE_SIZE;

/// Configuration for the sync response builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSyncConfig {
    /// Upper bound on blocks per response. Values above the protocol
    /// maximum are clamped to it.
    pub max_response_size: u32,
}

impl Default for ChainSyncConfig {
    fn default() -> Self {
        Self {
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }
}

impl ChainSyncConfig {
    pub fn for_testing() -> Self {
        Self::default()
    }

    /// Cap actually applied to responses.
    pub fn effective_max(&self) -> u32 {
        self.max_response_size.min(MAX_RESPONSE_SIZE)
    }
}
