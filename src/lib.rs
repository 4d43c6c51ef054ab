//! # fairlane
//!
//! **Fairlane** is a fairness-preserving keyed task scheduler for Rust.
//!
//! It multiplexes many independent logical queues, identified by an
//! arbitrary key, onto a shared worker pool, bounding how many jobs of any
//! one key may run concurrently so that no single key can monopolize the
//! pool and starve others. It is designed for systems that process
//! heterogeneous work grouped by tenant/user/resource while sharing a fixed
//! execution capacity.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ submit(k1,…) │   │ submit(k2,…) │   │ submit(None,…)│
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  FairScheduler                                                    │
//! │  - QueueRegistry (key → KeyQueue, lazy create, atomic reset)      │
//! │  - Bus (broadcast events)                                         │
//! │  - lifecycle passthroughs to the WorkerPool                       │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ KeyQueue k1  │   │ KeyQueue k2  │   │ default queue│
//!     │ FIFO + lanes │   │ FIFO + lanes │   │ FIFO + lanes │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘
//!      │ ≤ concurrent     │ ≤ concurrent     │ ≤ concurrent
//!      │ lane steps       │ lane steps       │ lane steps
//!      ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                  WorkerPool (shared, externally owned)            │
//! │            default: FixedPool over the tokio runtime              │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Dispatch lifecycle
//! ```text
//! put(job) ──► FIFO push + admission (one lock hold)
//!    │
//!    ├─ admission won ──► dispatch(): hand one lane step to the pool
//!    │                        │
//!    │                        ▼
//!    │                    step(): pop head ── empty → release slot, end
//!    │                        │
//!    │                        ├─► run job (panics caught, never halt lane)
//!    │                        └─► dispatch()   (chained continuation)
//!    │
//!    └─ admission lost ──► an active lane serves the job; nothing spawns
//! ```
//!
//! ## Guarantees
//! | Property          | Description                                                            |
//! |-------------------|------------------------------------------------------------------------|
//! | **Fairness**      | Keys compete for pool capacity independently; a flooded key only queues behind itself. |
//! | **Ordering**      | Per-key FIFO lane assignment; `concurrent = 1` gives exact sequential execution. |
//! | **Bounded lanes** | At most `concurrent` jobs of one key run simultaneously.               |
//! | **No busy-wait**  | Lanes are continuation-chained; an idle key costs nothing.             |
//! | **Lossless**      | Every job runs exactly once, or is returned by `reset`; never both, never neither. |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use fairlane::{FairScheduler, SchedulerConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut cfg = SchedulerConfig::default();
//!     cfg.concurrent = 1; // strict per-key FIFO
//!     cfg.workers = 4;
//!
//!     let scheduler: FairScheduler<&str> = FairScheduler::new(cfg);
//!
//!     // Keyed submission returns a completion handle.
//!     let reply = scheduler
//!         .submit("tenant-a", async { 40 + 2 })
//!         .expect("pool accepts work");
//!
//!     // Fire-and-forget under another key; "tenant-b" cannot be starved
//!     // by "tenant-a"'s backlog.
//!     scheduler
//!         .execute("tenant-b", async { /* work */ })
//!         .expect("pool accepts work");
//!
//!     assert_eq!(reply.await, Ok(42));
//!
//!     scheduler.shutdown();
//!     assert!(scheduler.await_termination(Duration::from_secs(5)).await);
//! }
//! ```

mod core;
mod error;
mod events;
mod jobs;
mod pool;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{FairScheduler, SchedulerBuilder, SchedulerConfig};
pub use error::{JobLost, PoolError, SchedulerError};
pub use events::{Event, EventKind};
pub use jobs::{Job, JobHandle};
pub use pool::{FixedPool, WorkUnit, WorkerPool};
pub use subscribers::Subscribe;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
