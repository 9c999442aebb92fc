//! Domain layer for block import

pub mod announce;
pub mod substitution;

pub use announce::BlockAnnounceMessage;
pub use substitution::CodeSubstitutes;
