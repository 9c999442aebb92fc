//! # Notifier
//!
//! Registry of subscriber channels for one event stream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::EventTopic;
use crate::subscriber::{NotifierChannel, NotifierId, SubscriptionError};

/// Fans one event stream out to every registered channel.
pub struct Notifier<T> {
    topic: EventTopic,
    channels: RwLock<HashMap<NotifierId, mpsc::Sender<T>>>,
    next_id: AtomicU64,
    events_published: AtomicU64,
    events_dropped: AtomicU64,
}

impl<T: Clone + Send> Notifier<T> {
    pub fn new(topic: EventTopic) -> Self {
        Self {
            topic,
            channels: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
            events_dropped: AtomicU64::new(0),
        }
    }

    /// Register a new channel with room for `buffer` pending events.
    pub fn register(&self, buffer: usize) -> NotifierChannel<T> {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.channels.write().insert(id, sender);
        debug!(topic = %self.topic, id, "Notifier channel registered");
        NotifierChannel { id, receiver }
    }

    /// Unregister a channel. Its receiver sees `None` once drained.
    pub fn free(&self, id: NotifierId) -> Result<(), SubscriptionError> {
        match self.channels.write().remove(&id) {
            Some(_) => {
                debug!(topic = %self.topic, id, "Notifier channel freed");
                Ok(())
            }
            None => Err(SubscriptionError::UnknownId(id)),
        }
    }

    /// Deliver to every channel; returns how many accepted the event.
    ///
    /// Never blocks. A full channel loses the event and bumps
    /// `events_dropped`.
    pub fn notify(&self, event: &T) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        let channels = self.channels.read();
        let mut delivered = 0;
        for (id, sender) in channels.iter() {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    let dropped = self.events_dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    warn!(topic = %self.topic, id, dropped, "Notifier channel full, event dropped");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(topic = %self.topic, id, "Notifier channel closed before free");
                }
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.channels.read().len()
    }

    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    /// Deliveries lost to full channels, summed over subscribers.
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }

    pub fn topic(&self) -> EventTopic {
        self.topic
    }
}
