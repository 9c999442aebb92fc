//! # Genesis Module
//!
//! Genesis block creation.
//!
//! The genesis block has number 0, a zero parent hash, no extrinsics and a
//! state root committing to the initial storage, which holds the runtime
//! code under `:code`.

pub mod builder;

pub use builder::{GenesisBuilder, GenesisConfig, GenesisError, GenesisState};
