//! # qc-01-block-import
//!
//! Block Import Coordinator: the single owner of "apply this block to chain
//! state".
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Apply step**: trie commit, indexing, digest hand-off, runtime changes
//! - **Code substitutes**: configured runtime code swapped in at given hashes
//! - **Pool upkeep**: included extrinsics pruned, pending ones revalidated
//! - **Reorg handling**: extrinsics from retracted blocks returned to the pool
//!
//! ## Architecture
//!
//! ```text
//! Networking ────────handle_block─────────┐
//!                                          ├──→ Block Import (1) ──→ Storage / Index
//! Block Production ──handle_block_produced┘          │
//!                                                     ├── handle_digests ──→ Digest Handler (2)
//!                                                     ├── gossip ──→ Networking
//!                                                     └── intake queue ──→ pool upkeep loop
//! ```
//!
//! ## Failure Classes
//!
//! | Error | Meaning |
//! |-------|---------|
//! | `InvalidParameter` | Malformed input, fatal to the call |
//! | `ParentNotFound` | Orphan, retry once the parent arrives |
//! | `Storage` | Commit or index failure, block not applied |
//! | `Runtime` | Parent runtime missing or upgrade failed |
//!
//! Digest, code-substitution and pool failures are logged and never undo a
//! committed block.
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_01_block_import::{BlockImportService, BlockImportDependencies, BlockImportConfig};
//! use qc_01_block_import::ports::inbound::BlockImportApi;
//!
//! let service = Arc::new(BlockImportService::new(deps, BlockImportConfig::default(), shutdown_rx)?);
//! service.start();
//!
//! service.handle_block(block, trie_state)?;
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::BlockImportConfig;
pub use domain::{BlockAnnounceMessage, CodeSubstitutes};
pub use error::{ImportError, ImportResult, RuntimeError};
pub use ports::inbound::BlockImportApi;
pub use ports::outbound::{
    BlockState, CodeSubstitutedState, DigestHandler, Network, RuntimeBuilder, RuntimeConfig,
    RuntimeInstance, SharedHandle, StorageState, TransactionState,
};
pub use service::{BlockImportDependencies, BlockImportService};
