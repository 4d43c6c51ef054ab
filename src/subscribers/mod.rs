//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the fan-out machinery
//! that delivers scheduler events to subscribers without touching the
//! submission hot path.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   KeyQueue / Registry ── publish(Event) ──► Bus ──► listener (in builder)
//!                                                        │
//!                                                        ▼
//!                                                  SubscriberSet
//!                                              ┌─────────┼─────────┐
//!                                              ▼         ▼         ▼
//!                                         [queue S1] [queue S2] [queue SN]
//!                                              ▼         ▼         ▼
//!                                        on_event()  on_event() on_event()
//! ```
//!
//! Subscribers run on dedicated workers fed by bounded queues: a slow or
//! panicking subscriber drops events for itself only (reported on the bus as
//! `SubscriberOverflow` / `SubscriberPanicked`) and never blocks publishers
//! or other subscribers.

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
