//! Ports for the Chain Sync subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::ChainSyncApi;
pub use outbound::BlockState;
