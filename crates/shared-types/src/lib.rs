//! # Shared Types Crate
//!
//! Chain primitives used by block import, digest handling and chain sync.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every cross-subsystem chain type is defined here.
//! - **Deterministic Identity**: a block is identified by the Blake2b-256 hash
//!   of its SCALE-encoded header, never by a stored field.
//! - **Opaque Payloads**: extrinsics and consensus payloads stay as bytes until
//!   the subsystem that owns their meaning decodes them.

pub mod digest;
pub mod entities;
pub mod errors;
pub mod state;
pub mod transaction;

pub use digest::*;
pub use entities::*;
pub use errors::*;
pub use state::TrieState;
pub use transaction::*;
