//! # Notifier Subscriptions
//!
//! The receiving half handed to a subscriber on registration.

use thiserror::Error;
use tokio::sync::mpsc;

/// Identifies one registered channel on a notifier.
pub type NotifierId = u64;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The id was never registered or has already been freed.
    #[error("Unknown notifier id: {0}")]
    UnknownId(NotifierId),
}

/// A registered channel. Pass `id` back to the notifier to unregister.
#[derive(Debug)]
pub struct NotifierChannel<T> {
    pub id: NotifierId,
    pub receiver: mpsc::Receiver<T>,
}

impl<T> NotifierChannel<T> {
    /// Next event, or `None` once the notifier has freed this channel.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}
