//! Domain types and pure logic for the mediaforge generation platform.
//!
//! This crate has no internal dependencies and no I/O. It defines:
//!
//! - [`job`] — the [`Job`](job::Job) record, its status state machine,
//!   progress, results, and failure codes.
//! - [`params`] — request parameter snapshot and per-kind validation.
//! - [`resolution`] — the aspect-ratio → pixel-dimension lookup table.
//! - [`sniff`] — magic-byte content-type classification for artifacts.
//! - [`error`] — the [`CoreError`](error::CoreError) taxonomy shared by
//!   every layer above.

pub mod error;
pub mod job;
pub mod params;
pub mod resolution;
pub mod sniff;
pub mod types;
