//! Generation job endpoints: submit, status, list, cancel, retry.
//!
//! Submission returns `202 Accepted` with the `pending` job — callers
//! observe everything after that by polling the status endpoint (or
//! subscribing to the event bus). Generation-time errors never surface
//! here; they finalize the job record asynchronously.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use mediaforge_core::job::{Job, JobKind};
use mediaforge_core::params::GenerationParams;
use mediaforge_core::types::JobId;
use serde::Deserialize;

use crate::auth::Caller;
use crate::error::AppResult;
use crate::query::JobListParams;
use crate::response::DataResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_job).get(list_jobs))
        .route("/{id}", get(get_job))
        .route("/{id}/cancel", post(cancel_job))
        .route("/{id}/retry", post(retry_job))
}

#[derive(Debug, Deserialize)]
struct SubmitJobRequest {
    kind: JobKind,
    #[serde(default)]
    params: GenerationParams,
}

/// `POST /api/v1/jobs` — create a job and return it immediately.
async fn submit_job(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Json(body): Json<SubmitJobRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Job>>)> {
    let job = state
        .orchestrator
        .submit(body.kind, body.params, owner)
        .await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: job })))
}

/// `GET /api/v1/jobs` — the caller's jobs, newest first.
async fn list_jobs(
    State(state): State<AppState>,
    Caller(owner): Caller,
    Query(params): Query<JobListParams>,
) -> AppResult<Json<DataResponse<Vec<Job>>>> {
    let jobs = state
        .orchestrator
        .list(owner, &params.into_filter())
        .await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// `GET /api/v1/jobs/{id}` — current job projection.
async fn get_job(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<JobId>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job = state.orchestrator.get_status(id, caller).await?;
    Ok(Json(DataResponse { data: job }))
}

/// `POST /api/v1/jobs/{id}/cancel` — 400 if the job is already terminal.
async fn cancel_job(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<JobId>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job = state.orchestrator.cancel(id, caller).await?;
    Ok(Json(DataResponse { data: job }))
}

/// `POST /api/v1/jobs/{id}/retry` — requeue a failed job.
async fn retry_job(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<JobId>,
) -> AppResult<(StatusCode, Json<DataResponse<Job>>)> {
    let job = state.orchestrator.retry(id, caller).await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: job })))
}
