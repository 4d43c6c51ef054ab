//! # Events emitted by the scheduler and its dispatch lanes.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Queue events**: enqueue, reset, size changes observable per key
//! - **Lane events**: admission wins, lane termination, per-job execution
//! - **Failure events**: dispatch hand-off failures, subscriber feedback
//!
//! The [`Event`] struct carries metadata such as a timestamp, the rendered
//! key label, queue depth, lane count, and error text.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events from
//! different lanes are observed interleaved.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Queue events ===
    /// A job was appended to a key's pending FIFO.
    ///
    /// Sets: `key`, `pending` (depth after the append), `at`, `seq`.
    JobEnqueued,

    /// A key's queue was swapped for a fresh one and its pending jobs
    /// reclaimed.
    ///
    /// Sets: `key`, `reclaimed` (number of jobs returned), `at`, `seq`.
    QueueReset,

    // === Lane events ===
    /// A submission won admission and a new dispatch lane was handed to the
    /// worker pool.
    ///
    /// Sets: `key`, `lanes` (in-flight count after the win), `at`, `seq`.
    LaneSpawned,

    /// A lane terminated and released its slot.
    ///
    /// Sets: `key`, `lanes` (in-flight count after the release), `reason`
    /// (`"drained"`, `"pool_shutdown"`, or a dispatch error label), `at`,
    /// `seq`.
    LaneReleased,

    /// A lane popped a job and started running it on the pool.
    ///
    /// Sets: `key`, `at`, `seq`.
    JobStarted,

    /// A job finished running (successfully or by panicking; panics never
    /// halt the lane).
    ///
    /// Sets: `key`, `at`, `seq`.
    JobFinished,

    // === Failure events ===
    /// The worker pool refused a lane hand-off; the lane stopped and the
    /// key's pending jobs remain queued.
    ///
    /// Sets: `key`, `reason` (pool error), `at`, `seq`.
    DispatchFailed,

    /// A lane observed pool shutdown and aborted, releasing its slot; the
    /// key's pending jobs remain queued for `reset` to reclaim.
    ///
    /// Sets: `key`, `at`, `seq`.
    ShutdownObserved,

    /// A subscriber dropped an event (its queue was full or its worker
    /// closed).
    ///
    /// Sets: `key` (subscriber name), `reason`, `at`, `seq`.
    SubscriberOverflow,

    /// A subscriber panicked while processing an event.
    ///
    /// Sets: `key` (subscriber name), `reason` (panic info), `at`, `seq`.
    SubscriberPanicked,
}

/// Scheduler event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Rendered key label (or subscriber name for subscriber feedback).
    pub key: Option<Arc<str>>,
    /// Pending-queue depth, where applicable.
    pub pending: Option<usize>,
    /// In-flight lane count, where applicable.
    pub lanes: Option<usize>,
    /// Number of jobs reclaimed by a reset.
    pub reclaimed: Option<usize>,
    /// Human-readable reason (errors, overflow details, lane exit cause).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            key: None,
            pending: None,
            lanes: None,
            reclaimed: None,
            reason: None,
        }
    }

    /// Attaches a rendered key label.
    #[inline]
    pub fn with_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attaches a pending-queue depth.
    #[inline]
    pub fn with_pending(mut self, pending: usize) -> Self {
        self.pending = Some(pending);
        self
    }

    /// Attaches an in-flight lane count.
    #[inline]
    pub fn with_lanes(mut self, lanes: usize) -> Self {
        self.lanes = Some(lanes);
        self
    }

    /// Attaches a reclaimed-job count.
    #[inline]
    pub fn with_reclaimed(mut self, reclaimed: usize) -> Self {
        self.reclaimed = Some(reclaimed);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// True for subscriber feedback events (overflow/panic).
    ///
    /// Used to stop feedback events from generating further feedback when a
    /// subscriber queue stays full.
    #[inline]
    pub fn is_subscriber_feedback(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::JobEnqueued);
        let b = Event::now(EventKind::JobEnqueued);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::now(EventKind::LaneReleased)
            .with_key("tenant-7")
            .with_lanes(0)
            .with_reason("drained");
        assert_eq!(ev.key.as_deref(), Some("tenant-7"));
        assert_eq!(ev.lanes, Some(0));
        assert_eq!(ev.reason.as_deref(), Some("drained"));
        assert!(!ev.is_subscriber_feedback());
        assert!(Event::now(EventKind::SubscriberOverflow).is_subscriber_feedback());
    }
}
