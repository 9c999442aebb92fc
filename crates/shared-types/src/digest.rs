//! # Header Digests
//!
//! Digest items carried in a block header. Consensus payloads stay opaque
//! here; the digest handler decodes them per engine.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Four-byte consensus engine tag.
pub type ConsensusEngineId = [u8; 4];

/// BABE block production.
pub const BABE_ENGINE_ID: ConsensusEngineId = *b"BABE";

/// GRANDPA finality.
pub const GRANDPA_ENGINE_ID: ConsensusEngineId = *b"FRNK";

/// A single header digest entry.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub enum DigestItem {
    #[codec(index = 0)]
    Other(Vec<u8>),
    /// Authority or epoch signal for the named engine.
    #[codec(index = 4)]
    Consensus(ConsensusEngineId, Vec<u8>),
    /// Block author's seal over the pre-seal header.
    #[codec(index = 5)]
    Seal(ConsensusEngineId, Vec<u8>),
    /// Slot claim placed before runtime execution.
    #[codec(index = 6)]
    PreRuntime(ConsensusEngineId, Vec<u8>),
    #[codec(index = 8)]
    RuntimeEnvironmentUpdated,
}

impl DigestItem {
    /// Engine id and payload when this is a consensus digest.
    pub fn as_consensus(&self) -> Option<(&ConsensusEngineId, &[u8])> {
        match self {
            DigestItem::Consensus(engine, data) => Some((engine, data.as_slice())),
            _ => None,
        }
    }
}

/// The ordered digest list of a header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub struct Digest {
    pub logs: Vec<DigestItem>,
}

impl Digest {
    pub fn new(logs: Vec<DigestItem>) -> Self {
        Self { logs }
    }

    pub fn push(&mut self, item: DigestItem) {
        self.logs.push(item);
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DigestItem> {
        self.logs.iter()
    }
}

impl From<Vec<DigestItem>> for Digest {
    fn from(logs: Vec<DigestItem>) -> Self {
        Self { logs }
    }
}
