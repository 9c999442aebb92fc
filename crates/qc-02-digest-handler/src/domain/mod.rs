//! Domain layer for consensus digests

pub mod digest;
pub mod pending;

pub use digest::{
    Authority, BabeConsensusDigest, ConfigData, ConsensusDigest, EpochData, GrandpaChange,
    GrandpaConsensusDigest,
};
pub use pending::{PendingChange, PendingChanges, NO_CHANGE_SCHEDULED};
