//! Engine-specific consensus digest payloads.
//!
//! | Engine | Index | Variant |
//! |--------|-------|---------|
//! | FRNK | 1 | ScheduledChange |
//! | FRNK | 2 | ForcedChange |
//! | FRNK | 3 | OnDisabled |
//! | FRNK | 4 | Pause |
//! | FRNK | 5 | Resume |
//! | BABE | 1 | NextEpochData |
//! | BABE | 2 | OnDisabled |
//! | BABE | 3 | NextConfigData |

use parity_scale_codec::{Decode, DecodeAll, Encode};
use shared_types::{ConsensusEngineId, BABE_ENGINE_ID, GRANDPA_ENGINE_ID};

use crate::error::{DigestError, DigestResult};

/// Authority key with its voting weight.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Authority {
    pub key: [u8; 32],
    pub weight: u64,
}

impl Authority {
    pub fn new(key: [u8; 32], weight: u64) -> Self {
        Self { key, weight }
    }
}

/// New GRANDPA authority set and the delay before it applies.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct GrandpaChange {
    pub authorities: Vec<Authority>,
    pub delay: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum GrandpaConsensusDigest {
    #[codec(index = 1)]
    ScheduledChange(GrandpaChange),
    #[codec(index = 2)]
    ForcedChange(GrandpaChange),
    #[codec(index = 3)]
    OnDisabled(u64),
    #[codec(index = 4)]
    Pause(u32),
    #[codec(index = 5)]
    Resume(u32),
}

/// Authorities and randomness of an upcoming BABE epoch.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct EpochData {
    pub authorities: Vec<Authority>,
    pub randomness: [u8; 32],
}

/// BABE slot parameters of an upcoming epoch.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct ConfigData {
    pub c1: u64,
    pub c2: u64,
    pub secondary_slots: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum BabeConsensusDigest {
    #[codec(index = 1)]
    NextEpochData(EpochData),
    #[codec(index = 2)]
    OnDisabled(u32),
    #[codec(index = 3)]
    NextConfigData(ConfigData),
}

/// A decoded consensus digest, by engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusDigest {
    Grandpa(GrandpaConsensusDigest),
    Babe(BabeConsensusDigest),
}

const GRANDPA_INDICES: &[u8] = &[1, 2, 3, 4, 5];
const BABE_INDICES: &[u8] = &[1, 2, 3];

fn decode_payload<T: Decode>(
    engine: &ConsensusEngineId,
    payload: &[u8],
    known: &[u8],
) -> DigestResult<T> {
    if let Some(index) = payload.first() {
        if !known.contains(index) {
            return Err(DigestError::UnrecognizedDigest {
                engine: *engine,
                index: *index,
            });
        }
    }
    Ok(T::decode_all(&mut &payload[..])?)
}

impl ConsensusDigest {
    /// Decode `payload` according to `engine`.
    pub fn from_parts(engine: &ConsensusEngineId, payload: &[u8]) -> DigestResult<Self> {
        match *engine {
            GRANDPA_ENGINE_ID => {
                decode_payload(engine, payload, GRANDPA_INDICES).map(ConsensusDigest::Grandpa)
            }
            BABE_ENGINE_ID => {
                decode_payload(engine, payload, BABE_INDICES).map(ConsensusDigest::Babe)
            }
            other => Err(DigestError::UnknownEngine(other)),
        }
    }

    pub fn engine(&self) -> ConsensusEngineId {
        match self {
            ConsensusDigest::Grandpa(_) => GRANDPA_ENGINE_ID,
            ConsensusDigest::Babe(_) => BABE_ENGINE_ID,
        }
    }
}
