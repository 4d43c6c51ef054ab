//! # Event bus for broadcasting scheduler events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from multiple sources (submission paths,
//! dispatch lanes running on pool workers, the registry).
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls
//!   `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all
//!   receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip the
//!   `n` oldest items.
//! - **No persistence**: events are dropped if there are no active receivers
//!   at send time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for scheduler events.
///
/// Multiple publishers can publish concurrently; receivers get clones of each
/// event. Cloning the bus is cheap (the sender is `Arc`-backed internally).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (minimum 1, clamped).
    ///
    /// Capacity is shared across all receivers, not per-receiver; receivers
    /// that fall behind by more than `capacity` events observe
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// Returns immediately; if there are no receivers the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that observes subsequent events.
    ///
    /// Each call creates an independent receiver that only sees events sent
    /// after it subscribed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::now(EventKind::JobEnqueued).with_key("k").with_pending(1));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::JobEnqueued);
        assert_eq!(ev.key.as_deref(), Some("k"));
        assert_eq!(ev.pending, Some(1));
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_dropped() {
        let bus = Bus::new(1);
        // No receiver yet; must not block or panic.
        bus.publish(Event::now(EventKind::QueueReset));
        let mut rx = bus.subscribe();
        bus.publish(Event::now(EventKind::LaneSpawned));
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::LaneSpawned);
    }
}
