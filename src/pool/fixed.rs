//! # FixedPool: default worker pool over tokio.
//!
//! A fixed-size set of worker tasks sharing one unbounded work channel:
//! bounded execution capacity with an unbounded accept queue.
//!
//! ## Architecture
//! ```text
//! execute(unit) ──► mpsc (unbounded) ──► worker 1 ─┐
//!                                    ──► worker 2 ─┼── unit.await
//!                                    ──► worker N ─┘
//!
//! shutdown():      drop sender → workers drain the channel, then exit
//! shutdown_now():  cancel token → workers stop immediately; queued units
//!                  are dropped, the running unit is aborted at its next
//!                  await point
//! ```
//!
//! ## Rules
//! - `execute` never blocks; after shutdown it returns [`PoolError::Shutdown`].
//! - Units are started in submission order (single shared channel), which is
//!   what lets distinct keys' lanes interleave at task granularity.
//! - Termination is tracked with a [`TaskTracker`]: the pool is terminated
//!   once it is shut down and every worker has exited.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::error::PoolError;

use super::worker::{WorkUnit, WorkerPool};

type SharedRx = Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<WorkUnit>>>;

/// Fixed-size worker pool over the current tokio runtime.
///
/// Must be constructed inside a tokio runtime (the workers are spawned
/// immediately). The worker count defaults to the host's available
/// parallelism when built through
/// [`SchedulerConfig`](crate::SchedulerConfig).
pub struct FixedPool {
    tx: Mutex<Option<mpsc::UnboundedSender<WorkUnit>>>,
    shutdown: AtomicBool,
    cancel: CancellationToken,
    tracker: TaskTracker,
}

impl FixedPool {
    /// Creates a pool with `workers` worker tasks (minimum 1, clamped).
    pub fn new(workers: usize) -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel::<WorkUnit>();
        let rx: SharedRx = Arc::new(tokio::sync::Mutex::new(rx));

        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();
        for _ in 0..workers.max(1) {
            tracker.spawn(Self::worker_loop(rx.clone(), cancel.clone()));
        }

        Arc::new(Self {
            tx: Mutex::new(Some(tx)),
            shutdown: AtomicBool::new(false),
            cancel,
            tracker,
        })
    }

    /// One worker: take the next unit from the shared channel and run it.
    ///
    /// Exits when the channel is closed and drained (graceful shutdown) or
    /// the token fires (immediate shutdown). The receiver lock is only held
    /// while waiting for a unit, never while running one.
    async fn worker_loop(rx: SharedRx, cancel: CancellationToken) {
        loop {
            let unit = {
                let mut rx = rx.lock().await;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    unit = rx.recv() => unit,
                }
            };
            let Some(unit) = unit else { break };
            tokio::select! {
                _ = cancel.cancelled() => break,
                () = unit => {}
            }
        }
    }

    /// Stops accepting work; workers drain the channel unless `hard`.
    fn close(&self, hard: bool) {
        {
            let mut tx = self.tx.lock();
            self.shutdown.store(true, Ordering::Release);
            *tx = None;
        }
        if hard {
            self.cancel.cancel();
        }
        self.tracker.close();
    }
}

#[async_trait]
impl WorkerPool for FixedPool {
    fn execute(&self, unit: WorkUnit) -> Result<(), PoolError> {
        let tx = self.tx.lock();
        match tx.as_ref() {
            Some(tx) => tx.send(unit).map_err(|_| PoolError::Shutdown),
            None => Err(PoolError::Shutdown),
        }
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    fn is_terminated(&self) -> bool {
        self.is_shutdown() && self.tracker.is_empty()
    }

    fn shutdown(&self) {
        self.close(false);
    }

    fn shutdown_now(&self) {
        self.close(true);
    }

    async fn await_termination(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    fn unit<F>(fut: F) -> WorkUnit
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        Box::pin(fut)
    }

    #[tokio::test]
    async fn test_executes_submitted_units() {
        let pool = FixedPool::new(2);
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let done = done.clone();
            pool.execute(unit(async move {
                done.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        pool.shutdown();
        assert!(pool.await_termination(Duration::from_secs(5)).await);
        assert_eq!(done.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_graceful_shutdown_drains_accepted_work() {
        let pool = FixedPool::new(1);
        let done = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let done = done.clone();
            pool.execute(unit(async move {
                done.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        pool.shutdown();
        assert!(pool.is_shutdown());
        assert!(pool.await_termination(Duration::from_secs(5)).await);
        assert!(pool.is_terminated());
        assert_eq!(done.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_rejects_after_shutdown() {
        let pool = FixedPool::new(1);
        pool.shutdown();
        let err = pool.execute(unit(async {})).unwrap_err();
        assert_eq!(err, PoolError::Shutdown);
    }

    #[tokio::test]
    async fn test_shutdown_now_drops_queued_units() {
        let pool = FixedPool::new(1);
        let release = Arc::new(Notify::new());
        let started = Arc::new(Notify::new());

        let (r, s) = (release.clone(), started.clone());
        pool.execute(unit(async move {
            s.notify_one();
            r.notified().await;
        }))
        .unwrap();
        started.notified().await;

        // Queued behind the blocker; must never run.
        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let ran = ran.clone();
            pool.execute(unit(async move {
                ran.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }

        pool.shutdown_now();
        assert!(pool.await_termination(Duration::from_secs(5)).await);
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_await_termination_times_out_without_shutdown() {
        let pool = FixedPool::new(1);
        assert!(!pool.await_termination(Duration::from_millis(20)).await);
        assert!(!pool.is_terminated());
        pool.shutdown();
        assert!(pool.await_termination(Duration::from_secs(5)).await);
    }
}
