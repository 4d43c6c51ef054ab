//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! Primarily useful for development, debugging, and the bundled demos.
//!
//! ## Output format
//! ```text
//! [enqueued] key="a" pending=3
//! [lane+] key="a" lanes=1
//! [job-start] key="a"
//! [job-done] key="a"
//! [lane-] key="a" lanes=0 reason=drained
//! [dispatch-failed] key="a" reason=pool shut down
//! [reset] key="a" reclaimed=7
//! [shutdown-observed] key="a"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use -
/// implement a custom [`Subscribe`] for structured logging or metrics
/// collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let key = e.key.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::JobEnqueued => {
                println!("[enqueued] key={key} pending={}", e.pending.unwrap_or(0));
            }
            EventKind::LaneSpawned => {
                println!("[lane+] key={key} lanes={}", e.lanes.unwrap_or(0));
            }
            EventKind::LaneReleased => {
                println!(
                    "[lane-] key={key} lanes={} reason={}",
                    e.lanes.unwrap_or(0),
                    e.reason.as_deref().unwrap_or("?")
                );
            }
            EventKind::JobStarted => {
                println!("[job-start] key={key}");
            }
            EventKind::JobFinished => {
                println!("[job-done] key={key}");
            }
            EventKind::DispatchFailed => {
                println!(
                    "[dispatch-failed] key={key} reason={}",
                    e.reason.as_deref().unwrap_or("?")
                );
            }
            EventKind::QueueReset => {
                println!("[reset] key={key} reclaimed={}", e.reclaimed.unwrap_or(0));
            }
            EventKind::ShutdownObserved => {
                println!("[shutdown-observed] key={key}");
            }
            EventKind::SubscriberOverflow => {
                println!(
                    "[subscriber-overflow] subscriber={key} reason={}",
                    e.reason.as_deref().unwrap_or("?")
                );
            }
            EventKind::SubscriberPanicked => {
                println!(
                    "[subscriber-panic] subscriber={key} reason={}",
                    e.reason.as_deref().unwrap_or("?")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
