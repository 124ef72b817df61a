//! Shared query parameter types for API handlers.

use mediaforge_core::job::{JobKind, JobStatus};
use mediaforge_store::JobFilter;
use serde::Deserialize;

/// Query parameters for `GET /api/v1/jobs` (`?status=&kind=&limit=&offset=`).
///
/// Limit defaults to 50 and is capped at 100 in the store layer.
#[derive(Debug, Default, Deserialize)]
pub struct JobListParams {
    pub status: Option<JobStatus>,
    pub kind: Option<JobKind>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl JobListParams {
    pub fn into_filter(self) -> JobFilter {
        JobFilter {
            status: self.status,
            kind: self.kind,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
