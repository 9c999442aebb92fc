//! # Adapter Implementations
//!
//! Concrete implementations of the **outbound ports** (SPI traits) of each
//! subsystem, all process-local.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER (Adapters)                      │
//! │  InMemoryChain, InMemoryTransactionPool, GossipRecorder, ...     │
//! └──────────────────────────────────────────────────────────────────┘
//!                              ↑ implements ↑
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       MIDDLE LAYER (Ports)                       │
//! │  qc-01 BlockState / StorageState, qc-02 EpochState, qc-03 ...    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

pub mod chain;
pub mod digest_bridge;
pub mod finality;
pub mod network;
pub mod runtime;
pub mod transaction_pool;

pub use chain::{InMemoryChain, CODE_KEY};
pub use digest_bridge::DigestBridge;
pub use finality::{InMemoryEpochState, InMemoryGrandpaState};
pub use network::GossipRecorder;
pub use runtime::{NativeRuntime, NativeRuntimeBuilder};
pub use transaction_pool::InMemoryTransactionPool;
