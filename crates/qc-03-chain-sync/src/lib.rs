//! # qc-03-chain-sync
//!
//! Chain Sync Response Builder: answers peer block requests with a bounded,
//! ordered list of blocks from the local chain.
//!
//! ## Overview
//!
//! A request names a start (number or hash), an optional inclusive end
//! hash, a direction and a maximum. The builder resolves the range against
//! the block index, then fills only the components selected by the
//! requested-data bitmask.
//!
//! ## Architecture
//!
//! ```text
//! Peer ──BlockRequest──→ Chain Sync (3) ──→ BlockState (index, bodies, ...)
//!      ←─BlockResponse──┘
//! ```
//!
//! ## Descending Resolution
//!
//! | Start | End hash | Range |
//! |-------|----------|-------|
//! | number | none | canonical `start..end` by number, end = start - (max + 1) |
//! | number | given | first block at `start` descending from end, down to end |
//! | hash | given | start down to end, start must descend from end |
//! | hash | none | parent links from start |
//!
//! Start number 0 is treated as 1 and numbers past the best block are
//! clamped to it. The maximum is never above 128.
//!
//! Missing components for a block leave that field `None`; only a failure
//! to resolve the range itself fails the request.

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::ChainSyncConfig;
pub use domain::{
    BlockData, BlockRequest, BlockResponse, Direction, FromBlock, RequestedData,
    MAX_RESPONSE_SIZE,
};
pub use error::{SyncError, SyncResult};
pub use ports::inbound::ChainSyncApi;
pub use ports::outbound::BlockState;
pub use service::ChainSyncService;
