//! Scheduler events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the scheduler, the queue registry,
//! per-key dispatch lanes, and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `FairScheduler`, `QueueRegistry` (reset), `KeyQueue`
//!   (enqueue/admission/lane lifecycle/dispatch failures), `SubscriberSet`
//!   workers (overflow/panic).
//! - **Consumers**: the scheduler's subscriber listener (fans out to
//!   `SubscriberSet`) and any receiver obtained via
//!   [`FairScheduler::subscribe`](crate::FairScheduler::subscribe).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
