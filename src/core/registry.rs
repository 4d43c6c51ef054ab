//! # Queue registry: key → KeyQueue map with lazy creation and atomic reset.
//!
//! The registry owns every per-key queue plus one always-present default
//! queue for key-less work. Entries are created on first resolve and persist
//! until `reset` swaps them for a fresh queue.
//!
//! ## Rules
//! - `resolve` publishes exactly one queue per key under concurrent access
//!   (read-lock fast path, write-lock `entry` slow path).
//! - `reset` swaps in a fresh queue and drains the old one; lanes already
//!   running against the old queue finish against its counter.
//! - The default queue is created once and never replaced.
//! - No task execution happens inside the registry.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::events::{Bus, Event, EventKind};
use crate::jobs::Job;
use crate::pool::WorkerPool;

use super::queue::KeyQueue;

/// Key → queue map shared by all submission paths.
pub(crate) struct QueueRegistry<K> {
    queues: RwLock<HashMap<K, Arc<KeyQueue>>>,
    /// Singleton queue for key-less submissions.
    default_queue: Arc<KeyQueue>,
    concurrent: usize,
    pool: Arc<dyn WorkerPool>,
    bus: Bus,
}

impl<K> QueueRegistry<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub(crate) fn new(concurrent: usize, pool: Arc<dyn WorkerPool>, bus: Bus) -> Self {
        let default_queue = KeyQueue::new("default", concurrent, pool.clone(), bus.clone());
        Self {
            queues: RwLock::new(HashMap::new()),
            default_queue,
            concurrent,
            pool,
            bus,
        }
    }

    fn make_queue(&self, key: &K) -> Arc<KeyQueue> {
        KeyQueue::new(
            format!("{key:?}"),
            self.concurrent,
            self.pool.clone(),
            self.bus.clone(),
        )
    }

    /// Returns the key's queue, creating and publishing it on first use.
    ///
    /// `None` returns the default queue. Double-checked insert: the common
    /// path is a shared read lock; only a miss takes the write lock, and the
    /// `entry` call makes the losing racer adopt the winner's queue.
    pub(crate) fn resolve(&self, key: Option<&K>) -> Arc<KeyQueue> {
        let Some(key) = key else {
            return Arc::clone(&self.default_queue);
        };
        if let Some(queue) = self.queues.read().get(key) {
            return Arc::clone(queue);
        }
        let mut queues = self.queues.write();
        Arc::clone(
            queues
                .entry(key.clone())
                .or_insert_with(|| self.make_queue(key)),
        )
    }

    /// Swaps in a fresh, empty queue for the key and returns the jobs that
    /// were pending in the old one (empty if the key had no queue).
    ///
    /// In-flight jobs of the old queue are unaffected; they run to completion
    /// against the old queue's counter.
    pub(crate) fn reset(&self, key: &K) -> Vec<Job> {
        let fresh = self.make_queue(key);
        let old = self.queues.write().insert(key.clone(), fresh);
        let reclaimed = match old {
            Some(old) => old.clear(),
            None => Vec::new(),
        };
        self.bus.publish(
            Event::now(EventKind::QueueReset)
                .with_key(format!("{key:?}"))
                .with_reclaimed(reclaimed.len()),
        );
        reclaimed
    }

    /// Pending (not yet dispatched) job count; 0 for unknown keys.
    pub(crate) fn pending(&self, key: Option<&K>) -> usize {
        match key {
            None => self.default_queue.pending_len(),
            Some(key) => self
                .queues
                .read()
                .get(key)
                .map(|q| q.pending_len())
                .unwrap_or(0),
        }
    }
}
