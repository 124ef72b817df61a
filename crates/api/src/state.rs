use std::sync::Arc;

use mediaforge_events::EventBus;
use mediaforge_orchestrator::Orchestrator;
use mediaforge_providers::ProviderRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The generation-job orchestrator.
    pub orchestrator: Orchestrator,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Configured providers, consulted by the health endpoint.
    pub registry: Arc<ProviderRegistry>,
    /// Job status change fan-out.
    pub event_bus: Arc<EventBus>,
}
