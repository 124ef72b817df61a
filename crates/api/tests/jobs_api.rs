//! Integration tests for the job endpoints: submit, status, list,
//! cancel, retry. The full middleware stack runs over the in-memory
//! store and a scripted mock provider.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, get, get_anon, post_empty, post_json, wait_terminal};
use mediaforge_core::types::UserId;
use mediaforge_providers::mock::MockProvider;
use mediaforge_providers::{PollPlan, ProviderArtifact};

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn owner() -> UserId {
    uuid::Uuid::new_v4()
}

fn image_job_body() -> serde_json::Value {
    serde_json::json!({
        "kind": "image",
        "params": { "prompt": "a red fox", "aspect_ratio": "1:1" }
    })
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_returns_202_with_pending_job() {
    let app = common::build_test_app(MockProvider::never_complete());
    let response = post_json(app, "/api/v1/jobs", owner(), image_job_body()).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(response).await;
    let job = &json["data"];
    assert!(!job["id"].as_str().unwrap().is_empty());
    assert_eq!(job["status"], "pending");
    assert_eq!(job["kind"], "image");
    assert!(job["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn submit_without_identity_is_unauthorized() {
    let app = common::build_test_app(MockProvider::named("mock"));

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/jobs")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(image_job_body().to_string()))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn submit_with_empty_prompt_is_rejected() {
    let app = common::build_test_app(MockProvider::named("mock"));
    let body = serde_json::json!({ "kind": "image", "params": { "prompt": "  " } });

    let response = post_json(app, "/api/v1/jobs", owner(), body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn submit_with_unknown_kind_is_rejected() {
    let app = common::build_test_app(MockProvider::named("mock"));
    let body = serde_json::json!({ "kind": "hologram", "params": { "prompt": "x" } });

    let response = post_json(app, "/api/v1/jobs", owner(), body).await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn video_job_requires_script_and_avatar() {
    let app = common::build_test_app(MockProvider::named("mock"));
    let body = serde_json::json!({ "kind": "video", "params": { "prompt": "hi" } });

    let response = post_json(app, "/api/v1/jobs", owner(), body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// End-to-end through the HTTP surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submitted_image_job_completes_with_square_result() {
    let app = common::build_test_app(MockProvider::succeed_after(
        1,
        vec![ProviderArtifact::Inline {
            bytes: PNG.to_vec(),
        }],
    ));
    let owner = owner();

    let response = post_json(app.clone(), "/api/v1/jobs", owner, image_job_body()).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let job_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let job = wait_terminal(&app, &job_id, owner).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["progress"]["percentage"], 100);

    let result = &job["results"][0];
    assert!(!result["url"].as_str().unwrap().is_empty());
    assert_eq!(result["format"], "image/png");
    assert_eq!(result["metadata"]["width"], 1024);
    assert_eq!(result["metadata"]["height"], 1024);
}

#[tokio::test]
async fn provider_failure_is_observable_via_status() {
    let app = common::build_test_app(MockProvider::fail_with("quota exceeded"));
    let owner = owner();

    let response = post_json(app.clone(), "/api/v1/jobs", owner, image_job_body()).await;
    let job_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let job = wait_terminal(&app, &job_id, owner).await;
    assert_eq!(job["status"], "failed");
    assert_eq!(job["error"]["message"], "quota exceeded");
    assert_eq!(job["error"]["code"], "GENERATION_FAILED");
}

// ---------------------------------------------------------------------------
// Status & ownership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_returns_404() {
    let app = common::build_test_app(MockProvider::named("mock"));
    let response = get(
        app,
        &format!("/api/v1/jobs/{}", uuid::Uuid::new_v4()),
        owner(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn foreign_job_returns_403() {
    let app = common::build_test_app(MockProvider::never_complete());
    let owner = owner();
    let stranger = uuid::Uuid::new_v4();

    let response = post_json(app.clone(), "/api/v1/jobs", owner, image_job_body()).await;
    let job_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = get(app, &format!("/api/v1/jobs/{job_id}"), stranger).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// Cancel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_running_job_and_reject_second_cancel() {
    let app = common::build_test_app(MockProvider::never_complete().with_plan(PollPlan {
        interval: Duration::from_millis(20),
        max_attempts: 500,
    }));
    let owner = owner();

    let response = post_json(app.clone(), "/api/v1/jobs", owner, image_job_body()).await;
    let job_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_empty(app.clone(), &format!("/api/v1/jobs/{job_id}/cancel"), owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "cancelled");
    assert!(!json["data"]["completed_at"].is_null());

    // Already terminal: a second cancel is a client error.
    let response = post_empty(app, &format!("/api/v1/jobs/{job_id}/cancel"), owner).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_STATE");
}

// ---------------------------------------------------------------------------
// Retry
// ---------------------------------------------------------------------------

#[tokio::test]
async fn retry_requeues_failed_job() {
    let app = common::build_test_app(MockProvider::fail_with("quota exceeded"));
    let owner = owner();

    let response = post_json(app.clone(), "/api/v1/jobs", owner, image_job_body()).await;
    let job_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    wait_terminal(&app, &job_id, owner).await;

    let response = post_empty(app.clone(), &format!("/api/v1/jobs/{job_id}/retry"), owner).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "queued");
    assert_eq!(json["data"]["retry_count"], 1);
    assert!(json["data"]["error"].is_null());
}

#[tokio::test]
async fn retry_of_non_failed_job_is_rejected() {
    let app = common::build_test_app(MockProvider::never_complete());
    let owner = owner();

    let response = post_json(app.clone(), "/api/v1/jobs", owner, image_job_body()).await;
    let job_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_empty(app, &format!("/api/v1/jobs/{job_id}/retry"), owner).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_scoped_to_the_caller() {
    let app = common::build_test_app(MockProvider::never_complete());
    let alice = owner();
    let bob = owner();

    for _ in 0..2 {
        post_json(app.clone(), "/api/v1/jobs", alice, image_job_body()).await;
    }
    post_json(app.clone(), "/api/v1/jobs", bob, image_job_body()).await;

    let response = get(app.clone(), "/api/v1/jobs", alice).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get(app, "/api/v1/jobs", bob).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_supports_status_filter_and_paging() {
    let app = common::build_test_app(MockProvider::fail_with("quota exceeded"));
    let owner = owner();

    let response = post_json(app.clone(), "/api/v1/jobs", owner, image_job_body()).await;
    let job_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    wait_terminal(&app, &job_id, owner).await;

    let response = get(app.clone(), "/api/v1/jobs?status=failed", owner).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get(app.clone(), "/api/v1/jobs?status=completed", owner).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let response = get(app, "/api/v1/jobs?limit=1&offset=5", owner).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
