//! Block announcement gossiped after a locally produced block is imported.

use parity_scale_codec::{Decode, Encode};
use shared_types::{BlockHeader, BlockNumber, Digest, Hash};

/// Header fields plus the best-block flag, as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BlockAnnounceMessage {
    pub parent_hash: Hash,
    #[codec(compact)]
    pub number: BlockNumber,
    pub state_root: Hash,
    pub extrinsics_root: Hash,
    pub digest: Digest,
    pub best_block: bool,
}

impl BlockAnnounceMessage {
    pub fn from_header(header: &BlockHeader, best_block: bool) -> Self {
        Self {
            parent_hash: header.parent_hash,
            number: header.number,
            state_root: header.state_root,
            extrinsics_root: header.extrinsics_root,
            digest: header.digest.clone(),
            best_block,
        }
    }

    /// The announced header, rebuilt.
    pub fn header(&self) -> BlockHeader {
        BlockHeader::new(
            self.parent_hash,
            self.number,
            self.state_root,
            self.extrinsics_root,
            self.digest.clone(),
        )
    }
}
