//! Partial job updates and the transition guard that applies them.
//!
//! Every mutation of a job record flows through [`JobPatch::apply`].
//! This is the single place where the forward-only state machine and
//! terminal-state immutability are enforced, so any [`JobStore`]
//! backend gets the same guarantees for free.
//!
//! [`JobStore`]: crate::job_store::JobStore

use mediaforge_core::job::{Job, JobFailure, JobResult, JobStatus, Progress};
use mediaforge_core::types::Timestamp;

use crate::error::StoreError;

/// A partial update to a job record. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub progress: Option<Progress>,
    /// Results may only be set together with `status = completed`.
    pub results: Option<Vec<JobResult>>,
    pub error: Option<JobFailure>,
    pub provider: Option<String>,
    pub provider_task_id: Option<String>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub retry_count: Option<u32>,
}

impl JobPatch {
    /// A patch that only moves the status.
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// A patch that only writes a progress checkpoint.
    pub fn progress(progress: Progress) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_results(mut self, results: Vec<JobResult>) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_error(mut self, error: JobFailure) -> Self {
        self.error = Some(error);
        self
    }

    pub fn with_completed_at(mut self, at: Timestamp) -> Self {
        self.completed_at = Some(at);
        self
    }

    pub fn with_started_at(mut self, at: Timestamp) -> Self {
        self.started_at = Some(at);
        self
    }

    /// Apply this patch to `job`, enforcing the state machine.
    ///
    /// Rules:
    /// - A terminal job accepts no patch, with one exception: the
    ///   explicit retry reset `failed -> queued`.
    /// - A status change must be a legal forward transition.
    /// - `results` may only be written together with `completed`.
    pub fn apply(&self, job: &mut Job) -> Result<(), StoreError> {
        let is_retry_reset =
            job.status == JobStatus::Failed && self.status == Some(JobStatus::Queued);
        if job.status.is_terminal() && !is_retry_reset {
            return Err(StoreError::IllegalUpdate(format!(
                "job {} is already {} and cannot be modified",
                job.id, job.status
            )));
        }

        if let Some(next) = self.status {
            if !job.status.can_transition_to(next) {
                return Err(StoreError::IllegalUpdate(format!(
                    "illegal status transition {} -> {next} for job {}",
                    job.status, job.id
                )));
            }
        }

        if self.results.is_some() && self.status != Some(JobStatus::Completed) {
            return Err(StoreError::IllegalUpdate(
                "results may only be written together with the completed transition".to_string(),
            ));
        }

        if let Some(next) = self.status {
            job.status = next;
        }
        if let Some(ref progress) = self.progress {
            job.progress = progress.clone();
        }
        if let Some(ref results) = self.results {
            job.results = results.clone();
        }
        if let Some(ref error) = self.error {
            job.error = Some(error.clone());
        }
        if let Some(ref provider) = self.provider {
            job.provider = Some(provider.clone());
        }
        if let Some(ref task_id) = self.provider_task_id {
            job.provider_task_id = Some(task_id.clone());
        }
        if let Some(at) = self.started_at {
            job.started_at = Some(at);
        }
        if let Some(at) = self.completed_at {
            job.completed_at = Some(at);
        }
        if let Some(count) = self.retry_count {
            job.retry_count = count;
        }

        // A retry reset clears the previous attempt's outcome.
        if self.status == Some(JobStatus::Queued) && job.error.is_some() {
            job.error = None;
            job.results.clear();
            job.provider_task_id = None;
            job.started_at = None;
            job.completed_at = None;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
