#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use mediaforge_api::config::ServerConfig;
use mediaforge_api::router::build_app_router;
use mediaforge_api::state::AppState;
use mediaforge_core::types::UserId;
use mediaforge_events::EventBus;
use mediaforge_orchestrator::Orchestrator;
use mediaforge_providers::mock::MockProvider;
use mediaforge_providers::ProviderRegistry;
use mediaforge_store::{BlobStore, JobStore, MemoryBlobStore, MemoryStore};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 0,
        media_dir: "./media".to_string(),
        media_public_base: "/media".to_string(),
    }
}

/// Build the full application router over the in-memory store, a single
/// scripted provider, and the in-memory blob store.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery) that production uses.
pub fn build_test_app(provider: MockProvider) -> Router {
    build_test_app_with(provider, Arc::new(MemoryBlobStore::new()), test_config())
}

pub fn build_test_app_with(
    provider: MockProvider,
    blobs: Arc<dyn BlobStore>,
    config: ServerConfig,
) -> Router {
    let mut registry = ProviderRegistry::new();
    registry.register(Arc::new(provider));
    let registry = Arc::new(registry);

    let store: Arc<dyn JobStore> = Arc::new(MemoryStore::new());
    let event_bus = Arc::new(EventBus::default());
    let orchestrator = Orchestrator::new(
        store,
        blobs,
        Arc::clone(&registry),
        Arc::clone(&event_bus),
    );

    let state = AppState {
        orchestrator,
        config: Arc::new(config.clone()),
        registry,
        event_bus,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// `GET` without a caller identity header.
pub async fn get_anon(app: Router, path: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// `GET` as the given caller.
pub async fn get(app: Router, path: &str, user: UserId) -> Response<Body> {
    let request = Request::builder()
        .uri(path)
        .header("x-user-id", user.to_string())
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// `POST` a JSON body as the given caller.
pub async fn post_json(
    app: Router,
    path: &str,
    user: UserId,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .header("x-user-id", user.to_string())
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// `POST` with no body as the given caller (cancel/retry endpoints).
pub async fn post_empty(app: Router, path: &str, user: UserId) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("x-user-id", user.to_string())
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read the full response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body is not JSON: {e}: {}",
            String::from_utf8_lossy(&bytes)
        )
    })
}

// ---------------------------------------------------------------------------
// Polling helpers
// ---------------------------------------------------------------------------

/// Poll the status endpoint until the job is terminal; return the job JSON.
pub async fn wait_terminal(app: &Router, job_id: &str, user: UserId) -> serde_json::Value {
    for _ in 0..1000 {
        let response = get(app.clone(), &format!("/api/v1/jobs/{job_id}"), user).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let status = json["data"]["status"].as_str().expect("status").to_string();
        if matches!(status.as_str(), "completed" | "failed" | "cancelled") {
            return json["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job {job_id} did not reach a terminal state in time");
}
