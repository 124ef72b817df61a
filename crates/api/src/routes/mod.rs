//! Route modules and the `/api/v1` route tree.

pub mod chat;
pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// All routes nested under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .nest("/chat", chat::router())
}
