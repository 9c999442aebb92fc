//! Block request and response messages.

use bitflags::bitflags;
use parity_scale_codec::{Decode, Encode, EncodeLike, Error, Input, Output};
use shared_types::{BlockHeader, BlockNumber, Body, Hash};

/// Protocol maximum number of blocks in one response.
pub const MAX_RESPONSE_SIZE: u32 = 128;

bitflags! {
    /// Components of each block a peer asks for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RequestedData: u8 {
        const HEADER = 0b0000_0001;
        const BODY = 0b0000_0010;
        const RECEIPT = 0b0000_0100;
        const MESSAGE_QUEUE = 0b0000_1000;
        const JUSTIFICATION = 0b0001_0000;
    }
}

impl Encode for RequestedData {
    fn size_hint(&self) -> usize {
        1
    }

    fn encode_to<T: Output + ?Sized>(&self, dest: &mut T) {
        dest.push_byte(self.bits())
    }
}

impl EncodeLike for RequestedData {}

impl Decode for RequestedData {
    fn decode<I: Input>(input: &mut I) -> Result<Self, Error> {
        Self::from_bits(input.read_byte()?)
            .ok_or_else(|| Error::from("Invalid requested data bits"))
    }
}

/// Block enumeration direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum Direction {
    /// From the start block towards the head.
    Ascending = 0,
    /// From the start block towards genesis.
    Descending = 1,
}

/// Starting point of a block sequence.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub enum FromBlock {
    Hash(Hash),
    Number(BlockNumber),
}

/// Request block data from a peer.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BlockRequest {
    pub requested_data: RequestedData,
    pub start: FromBlock,
    /// End at this block, inclusive.
    pub end_hash: Option<Hash>,
    pub direction: Direction,
    /// Defaults to, and is capped at, the protocol maximum.
    pub max: Option<u32>,
}

/// One block of a response. Only requested components are filled.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct BlockData {
    pub hash: Hash,
    pub header: Option<BlockHeader>,
    pub body: Option<Body>,
    pub receipt: Option<Vec<u8>>,
    pub message_queue: Option<Vec<u8>>,
    pub justification: Option<Vec<u8>>,
}

impl BlockData {
    pub fn new(hash: Hash) -> Self {
        Self {
            hash,
            header: None,
            body: None,
            receipt: None,
            message_queue: None,
            justification: None,
        }
    }
}

/// Response to a `BlockRequest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode)]
pub struct BlockResponse {
    pub blocks: Vec<BlockData>,
}

impl BlockResponse {
    pub fn hashes(&self) -> Vec<Hash> {
        self.blocks.iter().map(|b| b.hash).collect()
    }
}
