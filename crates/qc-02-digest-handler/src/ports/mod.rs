//! Ports for the Digest Handler subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::DigestHandlerApi;
pub use outbound::{BlockState, EpochState, GrandpaState};
