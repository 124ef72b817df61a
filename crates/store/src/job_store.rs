//! The generic durable job record store boundary.

use async_trait::async_trait;
use mediaforge_core::job::{Job, JobKind, JobStatus};
use mediaforge_core::types::{JobId, UserId};

use crate::error::StoreError;
use crate::patch::JobPatch;

/// Default page size for job listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Hard cap on the page size for job listings.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Filter/paging options for [`JobStore::list`].
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub kind: Option<JobKind>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

impl JobFilter {
    /// Effective limit after defaulting and capping.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT) as usize
    }

    /// Effective offset after defaulting.
    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0).max(0) as usize
    }
}

/// Durable job record store.
///
/// Implementations must provide per-id atomic updates and
/// read-your-writes consistency per job id: a status write followed by
/// a `get` of the same id observes that write.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Persist a newly created job record.
    async fn create(&self, job: Job) -> Result<(), StoreError>;

    /// Fetch a job by id. `Ok(None)` when absent.
    async fn get(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    /// Atomically apply `patch` to the job with the given id and return
    /// the updated record.
    ///
    /// The patch is validated against the job state machine; illegal
    /// updates (including any mutation of a terminal job other than the
    /// retry reset) fail with [`StoreError::IllegalUpdate`] and leave
    /// the record untouched.
    async fn update(&self, id: JobId, patch: JobPatch) -> Result<Job, StoreError>;

    /// List jobs belonging to `owner`, newest first.
    async fn list(&self, owner: UserId, filter: &JobFilter) -> Result<Vec<Job>, StoreError>;
}
