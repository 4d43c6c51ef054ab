//! Error types used by the fairlane scheduler and its worker-pool collaborator.
//!
//! This module defines three types:
//!
//! - [`PoolError`] — a worker pool refused to accept a unit of work.
//! - [`SchedulerError`] — errors surfaced by the scheduler's submission API.
//! - [`JobLost`] — the handle-side error: a job was discarded or panicked
//!   before producing a result.
//!
//! The enums provide helper methods (`as_label`, `as_message`) for
//! logging/metrics.

use thiserror::Error;

/// # Errors produced by a worker pool at hand-off time.
///
/// Returned by [`WorkerPool::execute`](crate::WorkerPool::execute) when the
/// pool cannot take the unit. The scheduler releases the affected lane slot
/// and leaves the key's pending queue intact; nothing is lost.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool has been shut down and no longer accepts work.
    #[error("worker pool is shut down")]
    Shutdown,

    /// The pool rejected the unit for an implementation-specific reason.
    #[error("worker pool rejected work: {reason}")]
    Rejected {
        /// Pool-provided rejection detail.
        reason: String,
    },
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use fairlane::PoolError;
    ///
    /// assert_eq!(PoolError::Shutdown.as_label(), "pool_shutdown");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::Shutdown => "pool_shutdown",
            PoolError::Rejected { .. } => "pool_rejected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PoolError::Shutdown => "pool shut down".to_string(),
            PoolError::Rejected { reason } => format!("rejected: {reason}"),
        }
    }
}

/// # Errors surfaced by [`FairScheduler`](crate::FairScheduler) submission calls.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Starting a dispatch lane failed because the pool refused the hand-off.
    ///
    /// The job stays queued under its key; a later submission (or an active
    /// lane) will pick it up if the pool recovers, and `reset` can reclaim it.
    #[error("dispatch hand-off failed: {0}")]
    Dispatch(#[from] PoolError),

    /// The operation is refused because it would bypass per-key admission.
    #[error("{op} is not supported: batch execution bypasses per-key fairness")]
    Unsupported {
        /// Name of the refused operation.
        op: &'static str,
    },
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::Dispatch(e) => e.as_label(),
            SchedulerError::Unsupported { .. } => "unsupported_operation",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SchedulerError::Dispatch(e) => format!("dispatch failed: {}", e.as_message()),
            SchedulerError::Unsupported { op } => format!("unsupported operation: {op}"),
        }
    }
}

/// # Handle-side completion failure.
///
/// Returned by awaiting a [`JobHandle`](crate::JobHandle) whose job will never
/// produce a result: it was reclaimed by `reset`, dropped during pool
/// teardown, or panicked while running. The dispatch chain itself is
/// unaffected by any of these.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("job did not complete: discarded or panicked before producing a result")]
pub struct JobLost;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(PoolError::Shutdown.as_label(), "pool_shutdown");
        assert_eq!(
            PoolError::Rejected { reason: "full".into() }.as_label(),
            "pool_rejected"
        );
        assert_eq!(
            SchedulerError::Unsupported { op: "invoke_all" }.as_label(),
            "unsupported_operation"
        );
        assert_eq!(
            SchedulerError::Dispatch(PoolError::Shutdown).as_label(),
            "pool_shutdown"
        );
    }

    #[test]
    fn test_messages_carry_detail() {
        let e = SchedulerError::Dispatch(PoolError::Rejected { reason: "queue closed".into() });
        assert!(e.as_message().contains("queue closed"));
        assert!(SchedulerError::Unsupported { op: "invoke_any" }
            .as_message()
            .contains("invoke_any"));
    }
}
