//! # Worker-pool contract.
//!
//! [`WorkerPool`] is the seam between the fairness core and whatever actually
//! runs the work. The core hands over [`WorkUnit`]s (dispatch-lane steps) and
//! requires only three things from the pool:
//!
//! - `execute` either accepts the unit for asynchronous execution or rejects
//!   it with a [`PoolError`]; rejection must be synchronous so the core can
//!   release the lane slot it reserved,
//! - `is_shutdown` is queryable at any time (lanes check it before every
//!   hand-off),
//! - lifecycle operations (`shutdown`, `shutdown_now`, `is_terminated`,
//!   `await_termination`) exist so the scheduler can delegate its own
//!   lifecycle surface; the core holds no lifecycle state of its own.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::PoolError;

/// Opaque unit of work handed to a pool: one dispatch-lane step.
pub type WorkUnit = BoxFuture<'static, ()>;

/// Contract the scheduler requires from its execution collaborator.
///
/// Implementations must tolerate `execute` being called concurrently from
/// many threads and from inside their own workers (lane chaining re-enters
/// `execute` from a completing unit).
#[async_trait]
pub trait WorkerPool: Send + Sync + 'static {
    /// Accepts a unit for asynchronous execution, or rejects it.
    ///
    /// A rejected unit is dropped by the pool; the scheduler guarantees the
    /// rejection cannot lose jobs (lane steps pop their job only once they
    /// are running).
    fn execute(&self, unit: WorkUnit) -> Result<(), PoolError>;

    /// True once the pool stopped accepting new work.
    fn is_shutdown(&self) -> bool;

    /// True once the pool stopped accepting work **and** all workers exited.
    fn is_terminated(&self) -> bool;

    /// Graceful shutdown: stop accepting work, run everything already
    /// accepted.
    fn shutdown(&self);

    /// Immediate shutdown: stop accepting work, drop queued units, abort
    /// running units at their next await point.
    fn shutdown_now(&self);

    /// Waits up to `timeout` for termination; true if the pool terminated.
    async fn await_termination(&self, timeout: Duration) -> bool;
}
