//! # KeyQueue: per-key admission and dispatch engine.
//!
//! One `KeyQueue` serializes all mutation of a single key's pending FIFO and
//! in-flight lane counter, and guarantees that exactly enough
//! self-perpetuating dispatch lanes run to keep up to `concurrent` jobs of
//! that key executing, with zero busy-polling.
//!
//! ## Dispatch flow
//! ```text
//! put(job)
//!   ├─► push job to FIFO tail ┐ one lock hold
//!   ├─► admission (hold)      ┘
//!   │     ├─ counter ≤ cap → this caller starts a lane: dispatch()
//!   │     └─ counter > cap → rollback; an active lane serves the job
//!   ▼
//! dispatch()                        (one hand-off, caller holds a slot)
//!   ├─ pool shut down → release slot, abort (jobs stay queued)
//!   ├─ pool.execute(step) ok → step runs on the pool
//!   └─ pool.execute(step) err → release slot, publish DispatchFailed,
//!                               propagate; FIFO intact
//!
//! step()                            (runs on the pool)
//!   ├─ pop FIFO head ── empty → release slot (same lock), lane ends
//!   ├─ run job (lock released; panics caught, never halt the lane)
//!   └─ dispatch()                   (chained continuation)
//! ```
//!
//! ## Locking discipline
//! - `put` performs the push **and** the admission increment under the
//!   pending lock; `step` performs the empty-pop release under that same
//!   lock. This pairing is what makes the increment/check/rollback race
//!   lossless: a losing racer never starts a lane, and any enqueued job is
//!   visible to some lane that still holds a slot.
//! - The counter itself is atomic so the abort/failure paths can release a
//!   slot without re-entering the lock.
//! - Job bodies never run while a lock is held.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use parking_lot::Mutex;

use crate::error::PoolError;
use crate::events::{Bus, Event, EventKind};
use crate::jobs::Job;
use crate::pool::{WorkUnit, WorkerPool};

/// Per-key FIFO of pending jobs plus the admission state for that key.
pub(crate) struct KeyQueue {
    /// Rendered key label carried on events.
    label: Arc<str>,
    /// Pending jobs, FIFO order. Guards the admission handshake (see module
    /// docs).
    pending: Mutex<VecDeque<Job>>,
    /// In-flight lane counter, bounded by `concurrent`.
    lanes: AtomicUsize,
    /// Maximum simultaneous lanes for this key.
    concurrent: usize,
    pool: Arc<dyn WorkerPool>,
    bus: Bus,
}

impl KeyQueue {
    pub(crate) fn new(
        label: impl Into<Arc<str>>,
        concurrent: usize,
        pool: Arc<dyn WorkerPool>,
        bus: Bus,
    ) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            pending: Mutex::new(VecDeque::new()),
            lanes: AtomicUsize::new(0),
            concurrent: concurrent.max(1),
            pool,
            bus,
        })
    }

    /// Enqueues a job and starts a new dispatch lane if admission allows.
    ///
    /// Never blocks on job execution. `Err` means the pool refused the lane
    /// hand-off; the job is still queued and will be served by a later lane.
    pub(crate) fn put(self: Arc<Self>, job: Job) -> Result<(), PoolError> {
        let (depth, admitted) = {
            let mut pending = self.pending.lock();
            pending.push_back(job);
            (pending.len(), self.hold())
        };
        self.bus.publish(
            Event::now(EventKind::JobEnqueued)
                .with_key(self.label.clone())
                .with_pending(depth),
        );
        if !admitted {
            return Ok(());
        }
        self.bus.publish(
            Event::now(EventKind::LaneSpawned)
                .with_key(self.label.clone())
                .with_lanes(self.lanes.load(Ordering::Acquire)),
        );
        self.dispatch()
    }

    /// Drains and returns the entire pending FIFO.
    ///
    /// The lane counter is untouched: already-dispatched jobs keep running
    /// and their lanes wind down against this queue once they find it empty.
    pub(crate) fn clear(&self) -> Vec<Job> {
        let mut pending = self.pending.lock();
        pending.drain(..).collect()
    }

    /// Pending (not yet popped) job count.
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    #[cfg(test)]
    pub(crate) fn in_flight(&self) -> usize {
        self.lanes.load(Ordering::Acquire)
    }

    /// Admission: reserve a lane slot. Rolls back and reports `false` when
    /// the key is already running at its cap.
    fn hold(&self) -> bool {
        if self.lanes.fetch_add(1, Ordering::AcqRel) < self.concurrent {
            true
        } else {
            self.lanes.fetch_sub(1, Ordering::AcqRel);
            false
        }
    }

    /// Releases a lane slot; returns the count after the release.
    fn release(&self) -> usize {
        self.lanes.fetch_sub(1, Ordering::AcqRel) - 1
    }

    /// One lane hand-off. The caller must hold a reserved slot.
    ///
    /// If the pool is already shut down the slot is released and the lane
    /// aborts; pending jobs stay queued until a reset reclaims them or a
    /// later submission finds the pool accepting again.
    fn dispatch(self: Arc<Self>) -> Result<(), PoolError> {
        if self.pool.is_shutdown() {
            let lanes = self.release();
            self.bus
                .publish(Event::now(EventKind::ShutdownObserved).with_key(self.label.clone()));
            self.bus.publish(
                Event::now(EventKind::LaneReleased)
                    .with_key(self.label.clone())
                    .with_lanes(lanes)
                    .with_reason("pool_shutdown"),
            );
            return Ok(());
        }

        let me = Arc::clone(&self);
        let step: WorkUnit = Box::pin(async move { me.step().await });
        match self.pool.execute(step) {
            Ok(()) => Ok(()),
            Err(e) => {
                let lanes = self.release();
                self.bus.publish(
                    Event::now(EventKind::DispatchFailed)
                        .with_key(self.label.clone())
                        .with_reason(e.as_message()),
                );
                self.bus.publish(
                    Event::now(EventKind::LaneReleased)
                        .with_key(self.label.clone())
                        .with_lanes(lanes)
                        .with_reason(e.as_label()),
                );
                Err(e)
            }
        }
    }

    /// One lane iteration, running on the pool: pop, run, chain.
    ///
    /// The job is popped here rather than at hand-off time, so a rejected
    /// hand-off strands nothing and jobs queued behind a saturated pool
    /// still count as pending.
    async fn step(self: Arc<Self>) {
        let job = {
            let mut pending = self.pending.lock();
            match pending.pop_front() {
                Some(job) => job,
                None => {
                    // Release under the pending lock: pairs with the
                    // push+hold in `put`.
                    let lanes = self.release();
                    drop(pending);
                    self.bus.publish(
                        Event::now(EventKind::LaneReleased)
                            .with_key(self.label.clone())
                            .with_lanes(lanes)
                            .with_reason("drained"),
                    );
                    return;
                }
            }
        };

        self.bus
            .publish(Event::now(EventKind::JobStarted).with_key(self.label.clone()));
        let _ = std::panic::AssertUnwindSafe(job).catch_unwind().await;
        self.bus
            .publish(Event::now(EventKind::JobFinished).with_key(self.label.clone()));

        // Chained continuation: job outcome never halts the lane. A failed
        // re-dispatch has already been published on the bus; the lane ends.
        let _ = self.dispatch();
    }
}
