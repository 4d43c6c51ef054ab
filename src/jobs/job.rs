//! # Job: one-shot unit of deferred work.
//!
//! A [`Job`] wraps a `Future<Output = ()>` and carries no identity beyond its
//! position in a key's FIFO. Jobs returned by
//! [`FairScheduler::reset`](crate::FairScheduler::reset) can be dropped,
//! awaited directly (`Job` is itself a future), or re-submitted via
//! [`FairScheduler::execute`](crate::FairScheduler::execute).
//!
//! ## Example
//! ```rust
//! use fairlane::Job;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let job = Job::new(async { /* work */ });
//! job.await; // runs the wrapped future
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;

/// Opaque one-shot unit of deferred work.
///
/// Created by [`Job::new`], or internally by
/// [`FairScheduler::submit`](crate::FairScheduler::submit), which wraps the
/// caller's future so its output is delivered through the returned
/// [`JobHandle`](crate::JobHandle). Dropping a `Job` without running it drops
/// the wrapped future; any handle attached to it resolves to
/// [`JobLost`](crate::JobLost).
pub struct Job {
    fut: BoxFuture<'static, ()>,
}

impl Job {
    /// Wraps a future as a job.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self { fut: Box::pin(fut) }
    }
}

impl Future for Job {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        self.fut.as_mut().poll(cx)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Job")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_job_runs_wrapped_future_when_awaited() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        Job::new(async move {
            flag.store(true, Ordering::SeqCst);
        })
        .await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dropped_job_never_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let job = Job::new(async move {
            flag.store(true, Ordering::SeqCst);
        });
        drop(job);
        assert!(!ran.load(Ordering::SeqCst));
    }
}
