//! # SchedulerBuilder: constructs a scheduler with optional collaborators.

use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::events::Bus;
use crate::pool::{FixedPool, WorkerPool};
use crate::subscribers::{Subscribe, SubscriberSet};

use super::config::SchedulerConfig;
use super::registry::QueueRegistry;
use super::scheduler::FairScheduler;

/// Builder for a [`FairScheduler`].
///
/// Lets callers inject their own worker pool (the scheduler core never owns
/// execution) and attach event subscribers before the bus starts carrying
/// traffic.
pub struct SchedulerBuilder<K> {
    cfg: SchedulerConfig,
    pool: Option<Arc<dyn WorkerPool>>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    _key: PhantomData<K>,
}

impl<K> SchedulerBuilder<K>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
{
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SchedulerConfig) -> Self {
        Self {
            cfg,
            pool: None,
            subscribers: Vec::new(),
            _key: PhantomData,
        }
    }

    /// Uses the given pool instead of a default [`FixedPool`].
    ///
    /// `SchedulerConfig::workers` is ignored when a pool is supplied.
    pub fn with_pool(mut self, pool: Arc<dyn WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive scheduler events (enqueues, lane lifecycle,
    /// dispatch failures, resets) through dedicated workers with bounded
    /// queues; a slow subscriber never blocks submission paths.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the scheduler.
    ///
    /// Must be called inside a tokio runtime when subscribers are attached or
    /// the default pool is used (both spawn tasks).
    pub fn build(self) -> FairScheduler<K> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let pool: Arc<dyn WorkerPool> = match self.pool {
            Some(pool) => pool,
            None => FixedPool::new(self.cfg.workers_resolved()),
        };

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            Self::spawn_listener(&bus, set);
        }

        let registry = QueueRegistry::new(self.cfg.concurrent_clamped(), pool.clone(), bus.clone());
        FairScheduler::from_parts(registry, pool, bus)
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    ///
    /// Ends when the bus closes (scheduler dropped); lagged receivers skip
    /// ahead rather than stopping.
    fn spawn_listener(bus: &Bus, set: SubscriberSet) {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        });
    }
}
