//! Chat-triggered generation.
//!
//! An in-conversation "draw me a ..." request maps onto a normal image
//! job — same orchestrator path, same guarantees. The chat layer is
//! expected to relay the returned job id so the conversation can track
//! completion through the usual status endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use mediaforge_core::job::{Job, JobKind};
use mediaforge_core::params::GenerationParams;
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate))
}

#[derive(Debug, Deserialize)]
struct ChatGenerateRequest {
    /// The message text, used verbatim as the generation prompt.
    message: String,
    aspect_ratio: Option<String>,
    style: Option<String>,
}

/// `POST /api/v1/chat/generate` — submit an image job from a chat message.
async fn generate(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Json(body): Json<ChatGenerateRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Job>>)> {
    let params = GenerationParams {
        prompt: body.message,
        aspect_ratio: body.aspect_ratio,
        style: body.style,
        ..Default::default()
    };

    let job = state
        .orchestrator
        .submit(JobKind::Image, params, owner)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: job })))
}
