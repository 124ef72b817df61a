//! Fixed progress milestones written by the background task.
//!
//! Checkpoints are coarse and approximate; they are not derived from
//! true upstream progress unless the provider supplies it.

use mediaforge_core::job::Progress;

/// Background task has started and the provider is selected.
pub const STARTED: u8 = 10;

/// Provider accepted the request and returned a task handle.
pub const ACCEPTED: u8 = 25;

/// Generation completed upstream; artifacts not yet ingested.
pub const GENERATED: u8 = 75;

/// Artifacts ingested and persisted.
pub const INGESTED: u8 = 90;

/// Job finalized.
pub const DONE: u8 = 100;

pub fn started() -> Progress {
    Progress::at(STARTED, "starting")
}

pub fn accepted() -> Progress {
    Progress::at(ACCEPTED, "generating")
}

pub fn generated() -> Progress {
    Progress::at(GENERATED, "generated")
}

pub fn ingested() -> Progress {
    Progress::at(INGESTED, "ingesting complete")
}

pub fn done() -> Progress {
    Progress::at(DONE, "completed")
}
