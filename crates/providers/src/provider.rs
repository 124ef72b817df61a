//! The [`Provider`] trait and the types shared by all integrations.

use async_trait::async_trait;
use mediaforge_core::job::JobKind;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::poll::PollPlan;

/// Provider-facing rendition of a generation request.
///
/// Built by the orchestrator from the job's immutable parameter
/// snapshot; prompt templating happens upstream of this type.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: JobKind,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub style: Option<String>,
    /// Output dimensions from the aspect-ratio table.
    pub width: u32,
    pub height: u32,
    /// Number of outputs requested (image-class only).
    pub count: u32,
    /// Source avatar reference for talking-head work.
    pub avatar_id: Option<uuid::Uuid>,
    /// Script to be spoken (talking-head only).
    pub script: Option<String>,
    /// Voice preset (talking-head only).
    pub voice: Option<String>,
}

/// Opaque provider-assigned correlation id used for polling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHandle {
    /// Name of the provider that issued the handle.
    pub provider: String,
    /// The provider's task id, opaque to us.
    pub task_id: String,
}

/// One artifact reference produced by a provider.
#[derive(Debug, Clone)]
pub enum ProviderArtifact {
    /// The provider hosts the artifact itself (typical for video).
    Remote { url: String },
    /// The provider returned raw bytes inline.
    Inline { bytes: Vec<u8> },
}

/// Everything a provider produced for one completed task.
#[derive(Debug, Clone, Default)]
pub struct ProviderOutput {
    pub artifacts: Vec<ProviderArtifact>,
}

/// Result of a single poll attempt.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Still working. Empty or ambiguous responses map here, never to
    /// `Failed` — providers are observed to return transient empty
    /// states.
    Pending,
    Succeeded(ProviderOutput),
    Failed { message: String },
}

/// An external generation backend.
///
/// Implementations encapsulate endpoint fallback and transient-error
/// retry for each single HTTP call; a returned error means every
/// endpoint and attempt was exhausted or the provider gave a definitive
/// application-level answer.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable provider name used for explicit selection and handles.
    fn name(&self) -> &'static str;

    /// Whether this provider can serve jobs of the given kind.
    fn supports(&self, kind: JobKind) -> bool;

    /// Poll interval and attempt ceiling tuned to this provider's
    /// expected latency class.
    fn poll_plan(&self) -> PollPlan;

    /// Issue the generation request, returning a handle to poll.
    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle, ProviderError>;

    /// Perform one status check for a previously submitted task.
    async fn poll(&self, handle: &TaskHandle) -> Result<PollOutcome, ProviderError>;
}

impl std::fmt::Debug for dyn Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name())
            .finish()
    }
}
