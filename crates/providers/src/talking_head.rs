//! Talking-head video provider client.
//!
//! Video synthesis is the slowest work in the system (minutes to tens
//! of minutes), so this client uses the video-class poll plan. The
//! provider hosts finished videos itself; results are always remote
//! URLs.
//!
//! - `submit`: `POST /v1/videos` with avatar reference, script, voice;
//!   task id from `id` then `task_id`.
//! - `poll`: primary `GET /v1/videos/{id}`; secondary batch shape
//!   `POST /v1/videos/result { "task_ids": [id] }`.
//!
//! Result-location priority, fixed by contract for this provider:
//! `video_url` → `url` → `result`.

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

pub const PROVIDER_NAME: &str = "talking-head";

const TASK_ID_FIELDS: &[&str] = &["id", "task_id"];
const RESULT_FIELDS: &[&str] = &["video_url", "url", "result"];
const LIST_FIELDS: &[&str] = &["videos"];

/// Client for the talking-head video rendering API.
pub struct TalkingHeadClient {
    transport: Transport,
}

impl TalkingHeadClient {
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
impl Provider for TalkingHeadClient {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn supports(&self, kind: JobKind) -> bool {
        matches!(kind, JobKind::Video)
    }

    fn poll_plan(&self) -> PollPlan {
        PollPlan::VIDEO
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<TaskHandle, ProviderError> {
        let body = json!({
            "avatar_id": request.avatar_id,
            "script": request.script,
            "voice": request.voice,
            "width": request.width,
            "height": request.height,
        });

        let response = self.transport.post_json("/v1/videos", &body).await?;

        let task_id = wire::first_nonempty_str(&response, TASK_ID_FIELDS)
            .ok_or_else(|| {
                ProviderError::Response(format!(
                    "submit response carries no task id: {response}"
                ))
            })?
            .to_string();

        tracing::info!(provider = PROVIDER_NAME, %task_id, "Video task accepted");

        Ok(TaskHandle {
            provider: PROVIDER_NAME.to_string(),
            task_id,
        })
    }

    async fn poll(&self, handle: &TaskHandle) -> Result<PollOutcome, ProviderError> {
        let primary = self
            .transport
            .get_json(&format!("/v1/videos/{}", handle.task_id))
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
                        "/v1/videos/result",
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn client() -> TalkingHeadClient {
        TalkingHeadClient::with_transport(
            Transport::new(vec!["http://unused.invalid".to_string()], None)
                .with_retry(1, Duration::from_millis(1)),
        )
    }

    #[test]
    fn video_url_has_priority() {
        let outcome = client().interpret(&json!({
            "status": "done",
            "video_url": "https://host/final.mp4",
            "result": "https://host/thumb.png",
        }));
        match outcome {
            PollOutcome::Succeeded(output) => match &output.artifacts[0] {
                ProviderArtifact::Remote { url } => assert_eq!(url, "https://host/final.mp4"),
                other => panic!("expected remote artifact, got {other:?}"),
            },
            other => panic!("expected Succeeded, got {other:?}"),
        }
    }

    #[test]
    fn uses_video_class_poll_plan() {
        let plan = client().poll_plan();
        assert_eq!(plan.interval, Duration::from_secs(10));
        assert_eq!(plan.max_attempts, 120);
    }

    #[test]
    fn transient_empty_body_is_pending() {
        let outcome = client().interpret(&serde_json::Value::Null);
        assert!(matches!(outcome, PollOutcome::Pending));
    }
}
