//! # JobHandle: completion handle for a submitted job.
//!
//! [`JobHandle`] is returned by
//! [`FairScheduler::submit`](crate::FairScheduler::submit) and resolves with
//! the job's output once a dispatch lane has run it. If the job can never
//! complete (it was reclaimed by `reset`, dropped during pool teardown, or
//! panicked while running), the handle resolves to [`JobLost`].
//!
//! ## Example
//! ```rust
//! use fairlane::{FairScheduler, SchedulerConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let scheduler: FairScheduler<&str> = FairScheduler::new(SchedulerConfig::default());
//! let handle = scheduler.submit("tenant-a", async { 40 + 2 }).unwrap();
//! assert_eq!(handle.await, Ok(42));
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::JobLost;

/// Completion handle for a submitted job.
///
/// Resolves to `Ok(output)` when the job runs to completion, or
/// `Err(JobLost)` when it never will. Dropping the handle detaches it; the
/// job still runs.
#[derive(Debug)]
pub struct JobHandle<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> JobHandle<T> {
    pub(crate) fn new(rx: oneshot::Receiver<T>) -> Self {
        Self { rx }
    }
}

impl<T> Future for JobHandle<T> {
    type Output = Result<T, JobLost>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map_err(|_| JobLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_resolves_with_output() {
        let (tx, rx) = oneshot::channel();
        let handle = JobHandle::new(rx);
        tx.send(7u32).unwrap();
        assert_eq!(handle.await, Ok(7));
    }

    #[tokio::test]
    async fn test_handle_resolves_lost_when_sender_dropped() {
        let (tx, rx) = oneshot::channel::<u32>();
        let handle = JobHandle::new(rx);
        drop(tx);
        assert_eq!(handle.await, Err(JobLost));
    }
}
