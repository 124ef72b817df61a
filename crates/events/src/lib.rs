//! Job status change fan-out for mediaforge.
//!
//! Provides the at-most-effort notifier from the orchestrator design:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`JobEvent`] — the canonical job status change envelope.
//!
//! Delivery is not guaranteed: slow subscribers lag, and with no
//! subscribers events are dropped. The job record store remains the
//! single authoritative source of job state.

pub mod bus;

pub use bus::{EventBus, JobEvent};
