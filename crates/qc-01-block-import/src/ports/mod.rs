//! Ports for the Block Import subsystem
//!
//! - `inbound`: API offered to networking and block production
//! - `outbound`: collaborators the coordinator drives

pub mod inbound;
pub mod outbound;

pub use inbound::BlockImportApi;
pub use outbound::{
    BlockState, CodeSubstitutedState, DigestHandler, Network, RuntimeBuilder, RuntimeConfig,
    RuntimeInstance, SharedHandle, StorageState, TransactionState,
};
