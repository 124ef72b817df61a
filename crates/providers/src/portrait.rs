//! Character avatar provider client ("portrait").
//!
//! Portrait-class image generation tuned for faces. Same integration
//! pattern as [`diffusion`](crate::diffusion) with this provider's own
//! paths and field priorities:
//!
//! - `submit`: `POST /v1/portraits`; task id from `task_id` then `id`.
//! - `poll`: primary `GET /v1/portraits/{id}`; secondary batch shape
//!   `POST /v1/portraits/batch { "task_ids": [id] }`.
//!
//! Result-location priority, fixed by contract for this provider:
//! `avatar_url` → `image_url` → `url`, list container `portraits`.

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

pub const PROVIDER_NAME: &str = "portrait";

const TASK_ID_FIELDS: &[&str] = &["task_id", "id"];
const RESULT_FIELDS: &[&str] = &["avatar_url", "image_url", "url"];
const LIST_FIELDS: &[&str] = &["portraits"];

/// Client for the portrait avatar generation API.
pub struct PortraitClient {
    transport: Transport,
}

impl PortraitClient {
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

    fn interpret(&self, payload: &serde_json::Value) -> PollOutcome {
        match wire::classify_state(payload) {
            RawState::Pending => PollOutcome::Pending,
            RawState::Failed => PollOutcome::Failed {
                message: wire::error_message(payload),
            },
            RawState::Succeeded => {
                let urls = wire::collect_urls(payload, RESULT_FIELDS, LIST_FIELDS);
                if urls.is_empty() {
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
impl Provider for PortraitClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn supports(&self, kind: JobKind) -> bool {
        matches!(kind, JobKind::Avatar)
    }

    fn poll_plan(&self) -> PollPlan {
        PollPlan::IMAGE
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle, ProviderError> {
        let body = json!({
            "prompt": request.prompt,
            "negative_prompt": request.negative_prompt,
            "style": request.style,
            "width": request.width,
            "height": request.height,
            "variations": request.count,
        });

        let response = self.transport.post_json("/v1/portraits", &body).await?;

        let task_id = wire::first_nonempty_str(&response, TASK_ID_FIELDS)
            .ok_or_else(|| {
                ProviderError::Response(format!(
                    "submit response carries no task id: {response}"
                ))
            })?
            .to_string();

        tracing::info!(provider = PROVIDER_NAME, %task_id, "Portrait task accepted");

        Ok(TaskHandle {
            provider: PROVIDER_NAME.to_string(),
            task_id,
        })
    }

    async fn poll(&self, handle: &TaskHandle) -> Result<PollOutcome, ProviderError> {
        let primary = self
            .transport
            .get_json(&format!("/v1/portraits/{}", handle.task_id))
            .await;

        let payload = match primary {
            Ok(payload) => payload,
            Err(primary_err) => {
                tracing::debug!(
                    provider = PROVIDER_NAME,
                    task_id = %handle.task_id,
                    error = %primary_err,
                    "Direct status shape failed, trying batch shape",
                );
                let batch = self
                    .transport
                    .post_json(
                        "/v1/portraits/batch",
                        &json!({ "task_ids": [handle.task_id] }),
                    )
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
