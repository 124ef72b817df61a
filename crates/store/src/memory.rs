//! In-memory [`JobStore`] backend.
//!
//! Used by the test harness and by single-node deployments that accept
//! losing job history on restart. Backed by a `tokio::sync::RwLock`
//! over a `HashMap`, which trivially satisfies per-id atomic updates
//! and read-your-writes consistency.

use std::collections::HashMap;

use async_trait::async_trait;
use mediaforge_core::job::Job;
use mediaforge_core::types::{JobId, UserId};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::job_store::{JobFilter, JobStore};
use crate::patch::JobPatch;

/// In-memory job record store.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create(&self, job: Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(StoreError::AlreadyExists(job.id));
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    async fn get(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn update(&self, id: JobId, patch: JobPatch) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(job)?;
        Ok(job.clone())
    }

    async fn list(&self, owner: UserId, filter: &JobFilter) -> Result<Vec<Job>, StoreError> {
        let jobs = self.jobs.read().await;
        let mut matched: Vec<Job> = jobs
            .values()
            .filter(|j| j.owner == owner)
            .filter(|j| filter.status.map(|s| j.status == s).unwrap_or(true))
            .filter(|j| filter.kind.map(|k| j.kind == k).unwrap_or(true))
            .cloned()
            .collect();

        // Newest first.
        matched.sort_by(|a, b| b.queued_at.cmp(&a.queued_at));

        Ok(matched
            .into_iter()
            .skip(filter.effective_offset())
            .take(filter.effective_limit())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
