//! # Core Chain Entities
//!
//! Blocks, headers and bodies as they travel between import, storage and sync.

use blake2::{digest::consts::U32, Blake2b};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// A 32-byte Blake2b-256 hash.
pub type Hash = [u8; 32];

/// Height of a block in the chain.
pub type BlockNumber = u64;

/// The all-zero hash, used as the parent of genesis.
pub const ZERO_HASH: Hash = [0u8; 32];

type Blake2b256 = Blake2b<U32>;

/// Blake2b-256 over arbitrary bytes.
pub fn blake2_256(data: &[u8]) -> Hash {
    <Blake2b256 as blake2::Digest>::digest(data).into()
}

/// First four bytes of a hash, hex encoded, for log lines.
pub fn short_hex(hash: &Hash) -> String {
    hex::encode(&hash[..4])
}

/// An opaque, SCALE-encoded extrinsic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Encode, Decode, Serialize, Deserialize)]
pub struct Extrinsic(pub Vec<u8>);

impl Extrinsic {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Ordered extrinsics of a block.
pub type Body = Vec<Extrinsic>;

/// The header of a block.
///
/// The number is compact-encoded so the hash matches the canonical
/// header encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub struct BlockHeader {
    pub parent_hash: Hash,
    #[codec(compact)]
    pub number: BlockNumber,
    pub state_root: Hash,
    pub extrinsics_root: Hash,
    pub digest: Digest,
}

impl BlockHeader {
    pub fn new(
        parent_hash: Hash,
        number: BlockNumber,
        state_root: Hash,
        extrinsics_root: Hash,
        digest: Digest,
    ) -> Self {
        Self {
            parent_hash,
            number,
            state_root,
            extrinsics_root,
            digest,
        }
    }

    /// Blake2b-256 of the SCALE encoding.
    pub fn hash(&self) -> Hash {
        blake2_256(&self.encode())
    }
}

/// A block: header plus body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Encode, Decode, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub body: Body,
}

impl Block {
    pub fn new(header: BlockHeader, body: Body) -> Self {
        Self { header, body }
    }

    pub fn hash(&self) -> Hash {
        self.header.hash()
    }

    pub fn number(&self) -> BlockNumber {
        self.header.number
    }
}

/// A finalised header together with the round and set it was finalised in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalisationInfo {
    pub header: BlockHeader,
    pub round: u64,
    pub set_id: u64,
}
