//! Text-to-image provider client ("diffusion").
//!
//! Integration pattern:
//!
//! - `submit`: `POST /v1/generations` with prompt, dimensions, and
//!   sample count; the task id is read from `id` then `task_id`.
//! - `poll`: primary shape `GET /v1/generations/{id}` (direct status);
//!   if the primary shape errors, the secondary batch shape
//!   `POST /v1/results { "ids": [id] }` is tried before the attempt
//!   counts as a failure.
//!
//! Result-location priority, fixed by contract for this provider:
//! `image_url` → `url` → `result`, with list containers `images` then
//! `outputs`.

use async_trait::async_trait;
use mediaforge_core::job::JobKind;
use serde_json::json;

use crate::config::ProviderCredentials;
use crate::error::ProviderError;
use crate::poll::PollPlan;
use crate::provider::{
    GenerationRequest, PollOutcome, Provider, ProviderArtifact, ProviderOutput, TaskHandle,
};
use crate::transport::Transport;
use crate::wire::{self, RawState};

pub const PROVIDER_NAME: &str = "diffusion";

/// Fields that may carry the task id in a submit response.
const TASK_ID_FIELDS: &[&str] = &["id", "task_id"];

/// Result-location field priority. Documented order, never inferred.
const RESULT_FIELDS: &[&str] = &["image_url", "url", "result"];

/// List containers that may hold per-image result objects.
const LIST_FIELDS: &[&str] = &["images", "outputs"];

/// Client for the diffusion image generation API.
pub struct DiffusionClient {
    transport: Transport,
}

impl DiffusionClient {
    pub fn new(credentials: &ProviderCredentials) -> Self {
        Self {
            transport: Transport::new(
                credentials.endpoints.clone(),
                Some(credentials.api_key.clone()),
            ),
        }
    }

    /// Test seam: inject a transport pointed at a scripted server.
    pub fn with_transport(transport: Transport) -> Self {
        Self { transport }
    }

    /// Interpret a status payload into a poll outcome.
    fn interpret(&self, payload: &serde_json::Value) -> PollOutcome {
        match wire::classify_state(payload) {
            RawState::Pending => PollOutcome::Pending,
            RawState::Failed => PollOutcome::Failed {
                message: wire::error_message(payload),
            },
            RawState::Succeeded => {
                let urls = wire::collect_urls(payload, RESULT_FIELDS, LIST_FIELDS);
                if urls.is_empty() {
                    // "Succeeded" with no result location is ambiguous;
                    // keep polling rather than fabricate a failure.
                    return PollOutcome::Pending;
                }
                PollOutcome::Succeeded(ProviderOutput {
                    artifacts: urls
                        .into_iter()
                        .map(|url| ProviderArtifact::Remote { url })
                        .collect(),
                })
            }
        }
    }
}

#[async_trait]
impl Provider for DiffusionClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn supports(&self, kind: JobKind) -> bool {
        matches!(kind, JobKind::Image | JobKind::Avatar)
    }

    fn poll_plan(&self) -> PollPlan {
        PollPlan::IMAGE
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle, ProviderError> {
        let body = json!({
            "prompt": request.prompt,
            "negative_prompt": request.negative_prompt,
            "width": request.width,
            "height": request.height,
            "samples": request.count,
            "style": request.style,
        });

        let response = self.transport.post_json("/v1/generations", &body).await?;

        let task_id = wire::first_nonempty_str(&response, TASK_ID_FIELDS)
            .ok_or_else(|| {
                ProviderError::Response(format!(
                    "submit response carries no task id: {response}"
                ))
            })?
            .to_string();

        tracing::info!(provider = PROVIDER_NAME, %task_id, "Generation task accepted");

        Ok(TaskHandle {
            provider: PROVIDER_NAME.to_string(),
            task_id,
        })
    }

    async fn poll(&self, handle: &TaskHandle) -> Result<PollOutcome, ProviderError> {
        // Primary: direct status shape.
        let primary = self
            .transport
            .get_json(&format!("/v1/generations/{}", handle.task_id))
            .await;

        let payload = match primary {
            Ok(payload) => payload,
            Err(primary_err) => {
                // Secondary: batch result shape, tried before this poll
                // attempt counts as a failure.
                tracing::debug!(
                    provider = PROVIDER_NAME,
                    task_id = %handle.task_id,
                    error = %primary_err,
                    "Direct status shape failed, trying batch result shape",
                );
                let batch = self
                    .transport
                    .post_json("/v1/results", &json!({ "ids": [handle.task_id] }))
                    .await?;
                batch
                    .get("results")
                    .and_then(|r| r.as_array())
                    .and_then(|r| r.first())
                    .cloned()
                    .unwrap_or(serde_json::Value::Null)
            }
        };

        Ok(self.interpret(&payload))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
