//! # Shared Bus - Chain Notifications
//!
//! Fan-out of block import and finalisation events to the subsystems that
//! react to them.
//!
//! ## Model
//!
//! ```text
//! ┌──────────────┐   notify()    ┌──────────────┐   recv()   ┌──────────────┐
//! │ Block Store  │ ────────────→ │   Notifier   │ ─────────→ │  Subscriber  │
//! └──────────────┘               │  id → sender │            │ (own channel)│
//!                                └──────────────┘            └──────────────┘
//!                                       ↑  free(id)                 │
//!                                       └───────────────────────────┘
//! ```
//!
//! - Every subscriber registers its own bounded channel and gets an id back.
//! - Subscribers must `free` their id when they stop listening; the notifier
//!   never guesses when a subscriber has gone away.
//! - A full subscriber channel drops that event for that subscriber only.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventTopic, FinalisedNotifier, ImportedNotifier};
pub use publisher::Notifier;
pub use subscriber::{NotifierChannel, NotifierId, SubscriptionError};

/// Default per-subscriber buffer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
