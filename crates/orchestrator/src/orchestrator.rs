//! The job orchestrator: creates durable job records, detaches one
//! background task per job, and drives each job to exactly one
//! terminal state.
//!
//! Mutation discipline: after creation, a job's mutable fields are
//! written only by its owning background task — with the single
//! exception of the explicit cancel path, which the task observes
//! cooperatively between poll attempts.

use std::sync::Arc;

use mediaforge_core::error::CoreError;
use mediaforge_core::job::{FailureCode, Job, JobFailure, JobKind, JobStatus, Progress};
use mediaforge_core::params::GenerationParams;
use mediaforge_core::resolution;
use mediaforge_core::types::{JobId, UserId};
use mediaforge_events::bus::{
    JOB_CANCELLED, JOB_COMPLETED, JOB_FAILED, JOB_PROGRESS, JOB_RETRIED, JOB_SUBMITTED,
};
use mediaforge_events::{EventBus, JobEvent};
use mediaforge_providers::{
    poll_until_terminal, GenerationRequest, PollResult, Provider, ProviderError, ProviderRegistry,
};
use mediaforge_store::{BlobStore, JobFilter, JobPatch, JobStore, StoreError};

use crate::error::OrchestratorError;
use crate::ingest::ArtifactIngestor;
use crate::progress;

/// Central coordinator for generation jobs.
///
/// Cheaply cloneable; all state is behind `Arc`.
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn JobStore>,
    registry: Arc<ProviderRegistry>,
    ingestor: Arc<ArtifactIngestor>,
    events: Arc<EventBus>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        blobs: Arc<dyn BlobStore>,
        registry: Arc<ProviderRegistry>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            store,
            registry,
            ingestor: Arc::new(ArtifactIngestor::new(blobs)),
            events,
        }
    }

    // -----------------------------------------------------------------
    // Synchronous surface
    // -----------------------------------------------------------------

    /// Validate, persist, and start a new generation job.
    ///
    /// Returns the `pending` job immediately; no provider I/O happens
    /// on this path. All further work runs on a detached task.
    pub async fn submit(
        &self,
        kind: JobKind,
        params: GenerationParams,
        owner: UserId,
    ) -> Result<Job, OrchestratorError> {
        params.validate(kind)?;

        let job = Job::new(kind, params, owner);
        self.store.create(job.clone()).await?;

        tracing::info!(
            job_id = %job.id,
            kind = %kind,
            owner = %owner,
            "Job submitted",
        );
        self.events.publish(
            JobEvent::for_job(JOB_SUBMITTED, &job)
                .with_payload(serde_json::json!({ "kind": kind })),
        );

        self.spawn_background(job.clone());
        Ok(job)
    }

    /// Cancel a non-terminal job.
    ///
    /// Sets `cancelled` and records `completed_at`. The background task
    /// is not stopped preemptively; it observes the cancellation at its
    /// next poll-iteration check, and a single in-flight HTTP call is
    /// allowed to complete.
    pub async fn cancel(&self, job_id: JobId, caller: UserId) -> Result<Job, OrchestratorError> {
        let job = self.load(job_id).await?;
        job.authorize(caller, "cancel")?;

        let cancelled = self
            .store
            .update(
                job_id,
                JobPatch::status(JobStatus::Cancelled).with_completed_at(chrono::Utc::now()),
            )
            .await?;

        tracing::info!(job_id = %job_id, owner = %caller, "Job cancelled");
        self.events
            .publish(JobEvent::for_job(JOB_CANCELLED, &cancelled));

        Ok(cancelled)
    }

    /// Explicitly retry a failed job.
    ///
    /// Permitted only from `failed` and only while the retry budget
    /// holds. Resets progress and status to `queued`, increments
    /// `retry_count`, and spawns a fresh background task — nothing of
    /// the previous attempt's in-memory state survives.
    pub async fn retry(&self, job_id: JobId, caller: UserId) -> Result<Job, OrchestratorError> {
        let job = self.load(job_id).await?;
        job.authorize(caller, "retry")?;

        if !job.can_retry() {
            return Err(CoreError::Validation(format!(
                "job {job_id} cannot be retried (status {}, {}/{} retries used)",
                job.status, job.retry_count, job.max_retries
            ))
            .into());
        }

        let reset = JobPatch {
            status: Some(JobStatus::Queued),
            progress: Some(Progress::default()),
            retry_count: Some(job.retry_count + 1),
            ..Default::default()
        };
        let requeued = self.store.update(job_id, reset).await?;

        tracing::info!(
            job_id = %job_id,
            retry_count = requeued.retry_count,
            "Job requeued for retry",
        );
        self.events
            .publish(JobEvent::for_job(JOB_RETRIED, &requeued));

        self.spawn_background(requeued.clone());
        Ok(requeued)
    }

    /// Read-only job projection for its owner.
    pub async fn get_status(&self, job_id: JobId, caller: UserId) -> Result<Job, OrchestratorError> {
        let job = self.load(job_id).await?;
        job.authorize(caller, "view")?;
        Ok(job)
    }

    /// List the caller's jobs, newest first.
    pub async fn list(
        &self,
        owner: UserId,
        filter: &JobFilter,
    ) -> Result<Vec<Job>, OrchestratorError> {
        Ok(self.store.list(owner, filter).await?)
    }

    async fn load(&self, job_id: JobId) -> Result<Job, OrchestratorError> {
        self.store
            .get(job_id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Job", id: job_id }.into())
    }

    // -----------------------------------------------------------------
    // Background task
    // -----------------------------------------------------------------

    /// Detach the background task that owns this job's lifecycle.
    ///
    /// The task has its own error boundary: any error short of a store
    /// failure finalizes the job as `failed`; it never propagates to
    /// the submitting request, which has long since returned.
    fn spawn_background(&self, job: Job) {
        let this = self.clone();
        tokio::spawn(async move {
            let job_id = job.id;
            if let Err(e) = this.run_job(job).await {
                tracing::error!(job_id = %job_id, error = %e, "Background task aborted");
                this.finalize_failure(
                    job_id,
                    FailureCode::GenerationFailed,
                    format!("internal error: {e}"),
                )
                .await;
            }
        });
    }

    /// Drive one job from `pending`/`queued` to a terminal state.
    async fn run_job(&self, job: Job) -> Result<(), OrchestratorError> {
        let job_id = job.id;

        // Select a provider: explicit request parameter, or the fixed
        // default priority order.
        let provider = match self
            .registry
            .select(job.kind, job.params.provider.as_deref())
        {
            Ok(provider) => provider,
            Err(e) => {
                self.finalize_failure(job_id, FailureCode::ProviderUnavailable, e.to_string())
                    .await;
                return Ok(());
            }
        };

        // Mark processing. A failure here means the job was cancelled
        // before the task got started; respect it and bow out.
        let patch = JobPatch {
            status: Some(JobStatus::Processing),
            started_at: Some(chrono::Utc::now()),
            provider: Some(provider.name().to_string()),
            progress: Some(progress::started()),
            ..Default::default()
        };
        let job = match self.store.update(job_id, patch).await {
            Ok(job) => job,
            Err(StoreError::IllegalUpdate(_)) => {
                tracing::info!(job_id = %job_id, "Job reached terminal state before start");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        self.publish_progress(&job);

        // Submit to the provider. Endpoint fallback and transient retry
        // live inside the client; an error here is definitive.
        let request = build_request(&job);
        let handle = match provider.submit(&request).await {
            Ok(handle) => handle,
            Err(e) => {
                let code = failure_code_for(&e);
                self.finalize_failure(job_id, code, e.to_string()).await;
                return Ok(());
            }
        };

        let job = match self
            .store
            .update(
                job_id,
                JobPatch {
                    provider_task_id: Some(handle.task_id.clone()),
                    progress: Some(progress::accepted()),
                    ..Default::default()
                },
            )
            .await
        {
            Ok(job) => job,
            Err(StoreError::IllegalUpdate(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        self.publish_progress(&job);

        // Poll until terminal, checking for cooperative cancellation
        // between attempts.
        let store = Arc::clone(&self.store);
        let result = poll_until_terminal(
            || provider.poll(&handle),
            provider.poll_plan(),
            move || {
                let store = Arc::clone(&store);
                async move {
                    match store.get(job_id).await {
                        Ok(Some(job)) => job.status == JobStatus::Cancelled,
                        // A vanished record means nothing left to drive.
                        Ok(None) => true,
                        Err(e) => {
                            tracing::error!(job_id = %job_id, error = %e, "Cancellation check failed");
                            false
                        }
                    }
                }
            },
        )
        .await;

        match result {
            Ok(PollResult::Succeeded(output)) => {
                self.complete_job(&job, provider.as_ref(), output).await?;
            }
            Ok(PollResult::Failed { message }) => {
                // Provider-reported failure, message preserved verbatim.
                self.finalize_failure(job_id, FailureCode::GenerationFailed, message)
                    .await;
            }
            Ok(PollResult::TimedOut { attempts }) => {
                self.finalize_failure(
                    job_id,
                    FailureCode::Timeout,
                    format!("generation did not complete within {attempts} poll attempts"),
                )
                .await;
            }
            Ok(PollResult::Cancelled) => {
                // The cancel path already finalized the record.
                tracing::info!(job_id = %job_id, "Background task observed cancellation");
            }
            Err(e) => {
                let code = failure_code_for(&e);
                self.finalize_failure(job_id, code, e.to_string()).await;
            }
        }

        Ok(())
    }

    /// Ingest provider output and finalize the job as completed.
    async fn complete_job(
        &self,
        job: &Job,
        provider: &dyn Provider,
        output: mediaforge_providers::ProviderOutput,
    ) -> Result<(), OrchestratorError> {
        let job_id = job.id;

        let updated = match self
            .store
            .update(job_id, JobPatch::progress(progress::generated()))
            .await
        {
            Ok(job) => job,
            Err(StoreError::IllegalUpdate(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        self.publish_progress(&updated);

        let dimensions =
            resolution::dimensions_or_default(job.params.aspect_ratio.as_deref());

        let mut results = Vec::with_capacity(output.artifacts.len());
        for (index, artifact) in output.artifacts.iter().enumerate() {
            let stem = format!("{job_id}-{index}");
            match self.ingestor.ingest(artifact, &stem, dimensions).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(
                        job_id = %job_id,
                        index,
                        error = %e,
                        "Artifact ingestion failed",
                    );
                }
            }
        }

        if results.is_empty() {
            self.finalize_failure(
                job_id,
                FailureCode::IngestionFailed,
                "no artifact could be persisted".to_string(),
            )
            .await;
            return Ok(());
        }

        let updated = match self
            .store
            .update(job_id, JobPatch::progress(progress::ingested()))
            .await
        {
            Ok(job) => job,
            Err(StoreError::IllegalUpdate(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        self.publish_progress(&updated);

        // Results are written atomically with the completed transition.
        let finalize = JobPatch::status(JobStatus::Completed)
            .with_results(results)
            .with_progress(progress::done())
            .with_completed_at(chrono::Utc::now());

        match self.store.update(job_id, finalize).await {
            Ok(completed) => {
                tracing::info!(
                    job_id = %job_id,
                    provider = provider.name(),
                    result_count = completed.results.len(),
                    duration_secs = completed.duration_secs(),
                    "Job completed",
                );
                self.events.publish(
                    JobEvent::for_job(JOB_COMPLETED, &completed).with_payload(
                        serde_json::json!({ "result_count": completed.results.len() }),
                    ),
                );
                Ok(())
            }
            Err(StoreError::IllegalUpdate(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Finalize a job as failed. Best-effort: a job cancelled in the
    /// meantime keeps its cancelled state.
    async fn finalize_failure(&self, job_id: JobId, code: FailureCode, message: String) {
        let patch = JobPatch::status(JobStatus::Failed)
            .with_error(JobFailure {
                message: message.clone(),
                code,
            })
            .with_completed_at(chrono::Utc::now());

        match self.store.update(job_id, patch).await {
            Ok(failed) => {
                tracing::warn!(job_id = %job_id, code = ?code, error = %message, "Job failed");
                self.events.publish(
                    JobEvent::for_job(JOB_FAILED, &failed)
                        .with_payload(serde_json::json!({ "message": message, "code": code })),
                );
            }
            Err(StoreError::IllegalUpdate(_)) => {
                tracing::info!(job_id = %job_id, "Job already terminal, failure not recorded");
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Failed to finalize job");
            }
        }
    }

    fn publish_progress(&self, job: &Job) {
        self.events.publish(
            JobEvent::for_job(JOB_PROGRESS, job).with_payload(serde_json::json!({
                "percentage": job.progress.percentage,
                "stage": job.progress.stage,
            })),
        );
    }
}

/// Build the provider-facing request from a job's parameter snapshot.
fn build_request(job: &Job) -> GenerationRequest {
    let (width, height) = resolution::dimensions_or_default(job.params.aspect_ratio.as_deref());
    GenerationRequest {
        kind: job.kind,
        prompt: job.params.prompt.clone(),
        negative_prompt: job.params.negative_prompt.clone(),
        style: job.params.style.clone(),
        width,
        height,
        count: job.params.image_count(),
        avatar_id: job.params.avatar_id,
        script: job.params.script.clone(),
        voice: job.params.voice.clone(),
    }
}

/// Map a provider error to the coarse failure category on the job.
fn failure_code_for(error: &ProviderError) -> FailureCode {
    match error {
        ProviderError::Unavailable(_) | ProviderError::NotConfigured(_) => {
            FailureCode::ProviderUnavailable
        }
        ProviderError::Rejected { .. }
        | ProviderError::Generation(_)
        | ProviderError::Response(_) => FailureCode::GenerationFailed,
    }
}
