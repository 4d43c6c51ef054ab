//! # FairScheduler: the public submission and lifecycle surface.
//!
//! [`FairScheduler`] ties the pieces together: the queue registry, the worker
//! pool collaborator, and the event bus. It owns no lifecycle state of its
//! own; shutdown and termination queries delegate entirely to the pool.
//!
//! ## High-level architecture
//! ```text
//! submit(key, fut) ─► Registry::resolve(key) ─► KeyQueue::put(job)
//!                                                   │ admission
//!                                                   ▼
//!                                          WorkerPool::execute(lane step)
//!                                                   │ pop → run → chain
//!                                                   ▼
//!                                          JobHandle resolves with output
//!
//! Every queue/lane transition is published on the Bus; subscribers attached
//! through the builder observe them without touching the hot path.
//! ```

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};

use crate::error::SchedulerError;
use crate::events::{Bus, Event};
use crate::jobs::{Job, JobHandle};
use crate::pool::WorkerPool;

use super::builder::SchedulerBuilder;
use super::config::SchedulerConfig;
use super::registry::QueueRegistry;

/// Fairness-preserving keyed scheduler over a shared worker pool.
///
/// Jobs submitted under the same key dispatch in FIFO order with at most
/// `concurrent` running simultaneously; distinct keys compete for pool
/// capacity independently, so no key can starve another by flooding its own
/// queue.
pub struct FairScheduler<K> {
    registry: QueueRegistry<K>,
    pool: Arc<dyn WorkerPool>,
    bus: Bus,
}

impl<K> FairScheduler<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
{
    /// Creates a scheduler with the default [`FixedPool`](crate::FixedPool).
    ///
    /// Must be called inside a tokio runtime. Use [`FairScheduler::builder`]
    /// to supply a custom pool or subscribers.
    pub fn new(cfg: SchedulerConfig) -> Self {
        Self::builder(cfg).build()
    }

    /// Returns a builder for a scheduler with optional collaborators.
    pub fn builder(cfg: SchedulerConfig) -> SchedulerBuilder<K> {
        SchedulerBuilder::new(cfg)
    }

    pub(crate) fn from_parts(
        registry: QueueRegistry<K>,
        pool: Arc<dyn WorkerPool>,
        bus: Bus,
    ) -> Self {
        Self {
            registry,
            pool,
            bus,
        }
    }

    /// Enqueues a future under `key` and returns a handle to its output.
    ///
    /// Pass `None` to use the default queue. Never blocks on execution.
    ///
    /// `Err` means the pool refused the lane hand-off; the job is still
    /// queued under its key and will run if a later submission (or an active
    /// lane) finds the pool accepting again, or it can be reclaimed with
    /// [`reset`](FairScheduler::reset).
    pub fn submit<F, T>(
        &self,
        key: impl Into<Option<K>>,
        fut: F,
    ) -> Result<JobHandle<T>, SchedulerError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job = Job::new(async move {
            let _ = tx.send(fut.await);
        });
        let key = key.into();
        self.registry.resolve(key.as_ref()).put(job)?;
        Ok(JobHandle::new(rx))
    }

    /// Fire-and-forget enqueue under `key`.
    ///
    /// Same admission and error semantics as [`submit`](FairScheduler::submit),
    /// without a handle. Jobs reclaimed by `reset` can be re-enqueued here
    /// (`Job` is itself a future).
    pub fn execute<F>(&self, key: impl Into<Option<K>>, fut: F) -> Result<(), SchedulerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        self.registry.resolve(key.as_ref()).put(Job::new(fut))?;
        Ok(())
    }

    /// Pending (enqueued, not yet dispatched) job count for `key`.
    ///
    /// 0 for unknown keys; `None` queries the default queue.
    pub fn size<'a>(&self, key: impl Into<Option<&'a K>>) -> usize
    where
        K: 'a,
    {
        self.registry.pending(key.into())
    }

    /// Replaces `key`'s queue with a fresh one, returning the jobs that were
    /// pending (not yet dispatched).
    ///
    /// This is the sole cancellation primitive: already-dispatched jobs keep
    /// running. Returned jobs can be dropped, awaited directly, or
    /// re-enqueued via [`execute`](FairScheduler::execute).
    pub fn reset(&self, key: &K) -> Vec<Job> {
        self.registry.reset(key)
    }

    /// Creates a receiver observing subsequent scheduler events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The worker-pool collaborator.
    pub fn pool(&self) -> &Arc<dyn WorkerPool> {
        &self.pool
    }

    // ---- Lifecycle passthroughs (the pool owns all lifecycle state) ----

    /// Graceful pool shutdown: accepted work runs, new hand-offs are refused.
    ///
    /// Jobs still pending in key queues stay there, neither executed nor
    /// discarded, until [`reset`](FairScheduler::reset) reclaims them.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    /// Immediate pool shutdown: queued work is dropped.
    pub fn shutdown_now(&self) {
        self.pool.shutdown_now();
    }

    /// True once the pool stopped accepting work.
    pub fn is_shutdown(&self) -> bool {
        self.pool.is_shutdown()
    }

    /// True once the pool stopped accepting work and all its workers exited.
    pub fn is_terminated(&self) -> bool {
        self.pool.is_terminated()
    }

    /// Waits up to `timeout` for the pool to terminate.
    pub async fn await_termination(&self, timeout: Duration) -> bool {
        self.pool.await_termination(timeout).await
    }

    // ---- Refused batch operations ----

    /// Refused: running a batch through one call would bypass per-key
    /// admission and break the fairness guarantees silently.
    pub fn invoke_all(&self, _jobs: Vec<Job>) -> Result<Vec<JobHandle<()>>, SchedulerError> {
        Err(SchedulerError::Unsupported { op: "invoke_all" })
    }

    /// Refused: see [`invoke_all`](FairScheduler::invoke_all).
    pub fn invoke_any(&self, _jobs: Vec<Job>) -> Result<JobHandle<()>, SchedulerError> {
        Err(SchedulerError::Unsupported { op: "invoke_any" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobLost;
    use crate::events::EventKind;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Semaphore;
    use tokio::time::sleep;

    fn scheduler(cfg: SchedulerConfig) -> FairScheduler<&'static str> {
        FairScheduler::new(cfg)
    }

    #[tokio::test]
    async fn test_submit_returns_job_output() {
        let s = scheduler(SchedulerConfig::default());
        let handle = s.submit("a", async { 40 + 2 }).unwrap();
        assert_eq!(handle.await, Ok(42));
    }

    #[tokio::test]
    async fn test_unkeyed_submissions_use_default_queue() {
        let s = scheduler(SchedulerConfig::default());
        let handle = s.submit(None, async { "ok" }).unwrap();
        assert_eq!(handle.await, Ok("ok"));
    }

    #[tokio::test]
    async fn test_single_lane_executes_in_submission_order() {
        let s = scheduler(SchedulerConfig {
            concurrent: 1,
            workers: 4,
            ..SchedulerConfig::default()
        });
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..20 {
            let order = order.clone();
            handles.push(
                s.submit("seq", async move {
                    order.lock().push(i);
                })
                .unwrap(),
            );
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(*order.lock(), (0..20).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_never_exceeds_lane_cap() {
        let s = scheduler(SchedulerConfig {
            concurrent: 2,
            workers: 10,
            ..SchedulerConfig::default()
        });
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..100 {
            let (running, peak) = (running.clone(), peak.clone());
            handles.push(
                s.submit("hot", async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(2)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                })
                .unwrap(),
            );
        }
        for h in handles {
            h.await.unwrap();
        }
        assert!(peak.load(Ordering::SeqCst) <= 2, "lane cap was exceeded");
    }

    #[tokio::test]
    async fn test_keys_progress_independently() {
        let s = scheduler(SchedulerConfig {
            concurrent: 1,
            workers: 2,
            ..SchedulerConfig::default()
        });
        let completions = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for key in ["a", "b"] {
            for _ in 0..5 {
                let completions = completions.clone();
                handles.push(
                    s.submit(key, async move {
                        sleep(Duration::from_millis(20)).await;
                        completions.lock().push(key);
                    })
                    .unwrap(),
                );
            }
        }
        for h in handles {
            h.await.unwrap();
        }

        let completions = completions.lock();
        assert_eq!(completions.iter().filter(|k| **k == "a").count(), 5);
        assert_eq!(completions.iter().filter(|k| **k == "b").count(), 5);
        // Both lanes ran side by side: b's first completion must land before
        // a's backlog fully drains.
        let first_b = completions.iter().position(|k| *k == "b").unwrap();
        let last_a = completions.iter().rposition(|k| *k == "a").unwrap();
        assert!(
            first_b < last_a,
            "key b was starved behind key a's backlog: {completions:?}"
        );
    }

    #[tokio::test]
    async fn test_reset_reclaims_pending_jobs_exactly() {
        let s = scheduler(SchedulerConfig {
            concurrent: 2,
            workers: 2,
            ..SchedulerConfig::default()
        });

        // Saturate both workers so nothing under "k" makes progress.
        let gate = Arc::new(Semaphore::new(0));
        let blocked = Arc::new(AtomicUsize::new(0));
        let mut blockers = Vec::new();
        for _ in 0..2 {
            let (gate, blocked) = (gate.clone(), blocked.clone());
            blockers.push(
                s.submit("blocker", async move {
                    blocked.fetch_add(1, Ordering::SeqCst);
                    let _permit = gate.acquire().await.unwrap();
                })
                .unwrap(),
            );
        }
        while blocked.load(Ordering::SeqCst) < 2 {
            sleep(Duration::from_millis(1)).await;
        }

        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let ran = ran.clone();
            s.execute("k", async move {
                ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        assert_eq!(s.size(&"k"), 10);

        let reclaimed = s.reset(&"k");
        assert_eq!(reclaimed.len(), 10);
        assert_eq!(s.size(&"k"), 0);

        gate.add_permits(2);
        for b in blockers {
            b.await.unwrap();
        }
        s.shutdown();
        assert!(s.await_termination(Duration::from_secs(5)).await);
        assert_eq!(ran.load(Ordering::SeqCst), 0, "reclaimed jobs must not run");
    }

    #[tokio::test]
    async fn test_executed_plus_reclaimed_equals_submitted() {
        let s = scheduler(SchedulerConfig {
            concurrent: 1,
            workers: 1,
            ..SchedulerConfig::default()
        });
        let executed = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let executed = executed.clone();
            s.execute("k", async move {
                sleep(Duration::from_millis(5)).await;
                executed.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        let reclaimed = s.reset(&"k").len();

        s.shutdown();
        assert!(s.await_termination(Duration::from_secs(5)).await);
        assert_eq!(executed.load(Ordering::SeqCst) + reclaimed, 5);
    }

    #[tokio::test]
    async fn test_put_after_pool_shutdown_keeps_job_queued() {
        let s = scheduler(SchedulerConfig {
            workers: 1,
            ..SchedulerConfig::default()
        });
        s.shutdown();

        // The lane aborts (releasing its slot); the job is neither executed
        // nor discarded.
        s.execute("k", async {}).unwrap();
        assert_eq!(s.size(&"k"), 1);

        let reclaimed = s.reset(&"k");
        assert_eq!(reclaimed.len(), 1);
        assert_eq!(s.size(&"k"), 0);
    }

    #[tokio::test]
    async fn test_panicking_job_does_not_halt_key() {
        let s = scheduler(SchedulerConfig {
            concurrent: 1,
            workers: 2,
            ..SchedulerConfig::default()
        });
        let bad = s.submit("k", async { panic!("job blew up") }).unwrap();
        let good = s.submit("k", async { 5 }).unwrap();

        assert_eq!(bad.await, Err(JobLost));
        assert_eq!(good.await, Ok(5));
    }

    #[tokio::test]
    async fn test_batch_operations_are_refused() {
        let s = scheduler(SchedulerConfig::default());
        let err = s.invoke_all(vec![Job::new(async {})]).unwrap_err();
        assert!(matches!(err, SchedulerError::Unsupported { op: "invoke_all" }));
        let err = s.invoke_any(vec![Job::new(async {})]).unwrap_err();
        assert!(matches!(err, SchedulerError::Unsupported { op: "invoke_any" }));
    }

    #[tokio::test]
    async fn test_lifecycle_delegates_to_pool() {
        let s = scheduler(SchedulerConfig {
            workers: 1,
            ..SchedulerConfig::default()
        });
        assert!(!s.is_shutdown());
        assert!(!s.is_terminated());

        s.shutdown();
        assert!(s.is_shutdown());
        assert!(s.await_termination(Duration::from_secs(5)).await);
        assert!(s.is_terminated());
    }

    #[tokio::test]
    async fn test_submission_events_reach_subscribers() {
        let s = scheduler(SchedulerConfig::default());
        let mut rx = s.subscribe();

        let handle = s.submit("observed", async {}).unwrap();
        handle.await.unwrap();

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::JobEnqueued);
        assert!(ev.key.as_deref().unwrap().contains("observed"));
        assert_eq!(ev.pending, Some(1));
    }

    #[tokio::test]
    async fn test_reclaimed_jobs_can_be_resubmitted() {
        let s = scheduler(SchedulerConfig {
            workers: 1,
            ..SchedulerConfig::default()
        });
        s.shutdown();
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let ran = ran.clone();
            s.execute("k", async move {
                ran.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        let mut reclaimed = s.reset(&"k");
        assert_eq!(reclaimed.len(), 1);

        // Fresh scheduler with a live pool takes over the reclaimed work.
        let s2: FairScheduler<&str> = FairScheduler::new(SchedulerConfig {
            workers: 1,
            ..SchedulerConfig::default()
        });
        s2.execute("k", reclaimed.pop().unwrap()).unwrap();
        s2.shutdown();
        assert!(s2.await_termination(Duration::from_secs(5)).await);
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }
}
