//! Domain layer for chain sync

pub mod message;

pub use message::{
    BlockData, BlockRequest, BlockResponse, Direction, FromBlock, RequestedData,
    MAX_RESPONSE_SIZE,
};
