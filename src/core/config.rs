//! # Scheduler configuration.
//!
//! Provides [`SchedulerConfig`], the centralized settings for a
//! [`FairScheduler`](crate::FairScheduler).
//!
//! ## Sentinel values
//! - `concurrent = 0` → treated as 1 (a key always gets at least one lane)
//! - `workers = 0` → size the default pool from `available_parallelism`
//! - `bus_capacity` → clamped to a minimum of 1 by the bus

/// Configuration for the scheduler runtime.
///
/// ## Field semantics
/// - `concurrent`: dispatch lanes allowed per key (not total queue depth)
/// - `workers`: worker count for the default pool; ignored when a custom
///   pool is supplied via the builder
/// - `bus_capacity`: event bus ring buffer size
///
/// All fields are public for flexibility. Prefer the helper accessors to
/// avoid sprinkling sentinel checks across the codebase.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Maximum simultaneous dispatch lanes per key.
    ///
    /// Every key gets the same cap; with `1`, jobs of one key execute in
    /// exact submission order. `0` is treated as `1`.
    pub concurrent: usize,

    /// Worker tasks in the default [`FixedPool`](crate::FixedPool).
    ///
    /// - `0` = use the host's available parallelism
    /// - `n > 0` = exactly `n` workers
    pub workers: usize,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Receivers that lag behind by more than this many events observe
    /// `Lagged` and skip older items. Minimum value is 1 (enforced by the
    /// bus).
    pub bus_capacity: usize,
}

impl SchedulerConfig {
    /// Per-key lane cap with the minimum-1 clamp applied.
    #[inline]
    pub fn concurrent_clamped(&self) -> usize {
        self.concurrent.max(1)
    }

    /// Default-pool worker count with the `0` sentinel resolved.
    #[inline]
    pub fn workers_resolved(&self) -> usize {
        if self.workers == 0 {
            std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(4)
        } else {
            self.workers
        }
    }

    /// Bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `concurrent = 1` (strict per-key FIFO execution)
    /// - `workers = 0` (size the default pool from the host)
    /// - `bus_capacity = 1024` (good baseline)
    fn default() -> Self {
        Self {
            concurrent: 1,
            workers: 0,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_sentinels_are_resolved() {
        let cfg = SchedulerConfig {
            concurrent: 0,
            workers: 0,
            bus_capacity: 0,
        };
        assert_eq!(cfg.concurrent_clamped(), 1);
        assert!(cfg.workers_resolved() >= 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn test_explicit_values_pass_through() {
        let cfg = SchedulerConfig {
            concurrent: 3,
            workers: 8,
            bus_capacity: 256,
        };
        assert_eq!(cfg.concurrent_clamped(), 3);
        assert_eq!(cfg.workers_resolved(), 8);
        assert_eq!(cfg.bus_capacity_clamped(), 256);
    }
}
