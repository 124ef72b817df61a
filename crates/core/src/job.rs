//! The [`Job`] record and its lifecycle state machine.
//!
//! A job is the durable representation of one generation request. It is
//! created once by the orchestrator, mutated only by the single
//! background task that owns it (plus the explicit cancel path), and
//! resolves to exactly one terminal state.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::params::GenerationParams;
use crate::types::{ArtifactId, JobId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Kind & status
// ---------------------------------------------------------------------------

/// The three concrete generation job variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    /// Text-to-image generation.
    Image,
    /// Character avatar (portrait-class image) generation.
    Avatar,
    /// Talking-head video rendering.
    Video,
}

impl JobKind {
    /// Stable lowercase name, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Image => "image",
            JobKind::Avatar => "avatar",
            JobKind::Video => "video",
        }
    }
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job lifecycle status.
///
/// Transitions only move forward:
/// `pending → queued → processing → {completed | failed | cancelled}`.
/// `queued` is optional and may be skipped (the normal submit path goes
/// straight from `pending` to `processing`; explicit retry resets a
/// failed job to `queued`). The three outcome states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Queued,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// Whether this status admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// Whether a transition from `self` to `next` is legal.
    ///
    /// Terminal states admit nothing. `retry` is the one backward-looking
    /// move and is modelled as `Failed → Queued`.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        use JobStatus::*;
        match (self, next) {
            (Pending, Queued) | (Pending, Processing) => true,
            (Queued, Processing) => true,
            (Processing, Completed) | (Processing, Failed) => true,
            // Cancellation is honored from any non-terminal state.
            (Pending, Cancelled) | (Queued, Cancelled) | (Processing, Cancelled) => true,
            // Provider submission can fail before processing starts.
            (Pending, Failed) | (Queued, Failed) => true,
            // Explicit job-level retry.
            (Failed, Queued) => true,
            _ => false,
        }
    }

    /// Stable lowercase name, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Coarse progress snapshot written at fixed orchestrator milestones.
///
/// `percentage` is expected to be non-decreasing over a job's lifetime;
/// a decrease indicates a bug rather than a contract violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    /// Completion estimate in `0..=100`.
    pub percentage: u8,
    /// Free-text label for the current stage (e.g. `"generating"`).
    pub stage: String,
    /// Optional estimated seconds remaining, when the provider supplies one.
    pub eta_seconds: Option<u32>,
}

impl Progress {
    /// A fresh zero-progress snapshot with the given stage label.
    pub fn at(percentage: u8, stage: impl Into<String>) -> Self {
        Self {
            percentage: percentage.min(100),
            stage: stage.into(),
            eta_seconds: None,
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Progress::at(0, "created")
    }
}

// ---------------------------------------------------------------------------
// Results & failure
// ---------------------------------------------------------------------------

/// Derived metadata attached to a produced artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Stable id of the persisted artifact, when locally persisted.
    /// `None` when the result is a verbatim remote URL.
    pub artifact_id: Option<ArtifactId>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// One produced artifact reference on a completed job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    /// Stable retrieval URL.
    pub url: String,
    pub filename: String,
    /// Content type, e.g. `image/png` or `video/mp4`.
    pub format: String,
    pub size_bytes: u64,
    pub metadata: ResultMetadata,
}

/// Coarse failure categories surfaced on a failed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    ProviderUnavailable,
    Timeout,
    Validation,
    GenerationFailed,
    IngestionFailed,
}

/// Terminal error recorded on a job that reached `failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailure {
    /// Human-readable cause. Provider-reported messages are preserved
    /// verbatim for diagnostics.
    pub message: String,
    pub code: FailureCode,
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// The central durable record for one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub owner: UserId,
    pub kind: JobKind,
    pub status: JobStatus,
    /// Immutable snapshot of the request inputs. Never mutated after
    /// creation; re-runs create new jobs.
    pub params: GenerationParams,
    pub progress: Progress,
    /// Ordered produced artifacts. Empty until `status == completed`,
    /// written exactly once together with that transition.
    pub results: Vec<JobResult>,
    pub error: Option<JobFailure>,
    /// Name of the provider that accepted the job.
    pub provider: Option<String>,
    /// Opaque provider-assigned correlation id used for polling.
    pub provider_task_id: Option<String>,
    pub queued_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub retry_count: u32,
    pub max_retries: u32,
}

/// Default job-level retry allowance. Retries are always explicit; this
/// only bounds how many times `retry` may be invoked.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

impl Job {
    /// Create a new `pending` job owned by `owner`.
    pub fn new(kind: JobKind, params: GenerationParams, owner: UserId) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            owner,
            kind,
            status: JobStatus::Pending,
            params,
            progress: Progress::default(),
            results: Vec::new(),
            error: None,
            provider: None,
            provider_task_id: None,
            queued_at: chrono::Utc::now(),
            started_at: None,
            completed_at: None,
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Wall-clock duration from start to completion, when both are known.
    pub fn duration_secs(&self) -> Option<f64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }

    /// Verify that `caller` owns this job.
    ///
    /// `action` is used in the error message (e.g. "view", "cancel").
    pub fn authorize(&self, caller: UserId, action: &str) -> Result<(), CoreError> {
        if self.owner != caller {
            return Err(CoreError::Forbidden(format!(
                "Cannot {action} another user's job"
            )));
        }
        Ok(())
    }

    /// Whether an explicit retry is currently permitted.
    pub fn can_retry(&self) -> bool {
        self.status == JobStatus::Failed && self.retry_count < self.max_retries
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
