//! The mediaforge job orchestrator.
//!
//! Coordinates the full lifetime of a generation job: create the
//! durable record, detach a background task, drive the selected
//! provider through submit → poll → resolve, ingest artifacts, and
//! finalize the record exactly once. The HTTP layer above is a thin
//! shell over [`Orchestrator`].

pub mod error;
pub mod ingest;
pub mod orchestrator;
pub mod progress;

pub use error::OrchestratorError;
pub use ingest::ArtifactIngestor;
pub use orchestrator::Orchestrator;
