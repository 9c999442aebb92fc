//! # qc-02-digest-handler
//!
//! Consensus Digest Handler: decodes consensus digests from imported headers
//! and drives the GRANDPA authority-set change state machine.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **GRANDPA**: scheduled and forced authority changes, pause and resume
//! - **BABE**: next-epoch and next-config data written for the following epoch
//! - **Notification loops**: import and finalisation events apply due changes
//!
//! ## Architecture
//!
//! ```text
//! Block Import (1) ──handle_digests──→ Digest Handler (2) ──→ GRANDPA / epoch state
//!                                           ↑         ↑
//! Block Storage ──imported notifications────┘         │
//! Block Storage ──finalised notifications─────────────┘
//! ```
//!
//! ## State Machine
//!
//! | Event | Effect |
//! |-------|--------|
//! | ScheduledChange | tracked at best + delay, ignored if one is pending |
//! | ForcedChange | tracked at header + delay, error if one is pending |
//! | Import of N | resume cleared once due; forced change applied once due |
//! | Finalisation of N | pause cleared once due; scheduled change applied once due; forced change dropped |
//!
//! ## Example
//!
//! ```rust,ignore
//! use qc_02_digest_handler::{DigestHandlerService, DigestHandlerDependencies, DigestHandlerConfig};
//! use qc_02_digest_handler::ports::inbound::DigestHandlerApi;
//!
//! let handler = Arc::new(DigestHandlerService::new(deps, DigestHandlerConfig::default(), shutdown_rx));
//! handler.start();
//!
//! handler.handle_digests(&header);
//! let next = handler.next_grandpa_authority_change();
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::DigestHandlerConfig;
pub use domain::{
    Authority, BabeConsensusDigest, ConfigData, ConsensusDigest, EpochData, GrandpaChange,
    GrandpaConsensusDigest, PendingChange, PendingChanges, NO_CHANGE_SCHEDULED,
};
pub use error::{DigestError, DigestResult};
pub use ports::inbound::DigestHandlerApi;
pub use ports::outbound::{BlockState, EpochState, GrandpaState};
pub use service::{DigestHandlerDependencies, DigestHandlerService};
