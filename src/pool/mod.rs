//! # Worker pool: the execution collaborator.
//!
//! The scheduler core is a cooperative chaining layer; it spawns no execution
//! contexts of its own. All asynchronous progress happens inside a
//! [`WorkerPool`], which accepts opaque [`WorkUnit`]s for asynchronous
//! execution and owns the process-wide lifecycle (shutdown, termination).
//!
//! - [`WorkerPool`] - the collaborator contract
//! - [`FixedPool`] - the default implementation: a fixed-size set of tokio
//!   worker tasks fed by a shared work channel

mod fixed;
mod worker;

pub use fixed::FixedPool;
pub use worker::{WorkUnit, WorkerPool};
