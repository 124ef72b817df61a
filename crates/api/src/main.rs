use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mediaforge_api::config::ServerConfig;
use mediaforge_api::router::build_app_router;
use mediaforge_api::state::AppState;
use mediaforge_events::EventBus;
use mediaforge_orchestrator::Orchestrator;
use mediaforge_providers::{ProviderConfig, ProviderRegistry};
use mediaforge_store::{BlobStore, FsBlobStore, JobStore, MemoryStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mediaforge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Providers ---
    let provider_config = ProviderConfig::from_env();
    let registry = Arc::new(ProviderRegistry::from_config(&provider_config));
    if registry.names().is_empty() {
        tracing::warn!("No providers configured; all submissions will fail as unavailable");
    } else {
        tracing::info!(providers = ?registry.names(), "Providers configured");
    }

    // --- Storage ---
    // Single-node deployment: in-memory job records, filesystem artifacts
    // served under the media base path.
    let store: Arc<dyn JobStore> = Arc::new(MemoryStore::new());
    let blobs: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(
        &config.media_dir,
        config.media_public_base.clone(),
    ));
    tracing::info!(media_dir = %config.media_dir, "Artifact store ready");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- Orchestrator ---
    let orchestrator = Orchestrator::new(
        store,
        blobs,
        Arc::clone(&registry),
        Arc::clone(&event_bus),
    );

    // --- App state & router ---
    let state = AppState {
        orchestrator,
        config: Arc::new(config.clone()),
        registry,
        event_bus,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown drain ---
    // Background generation tasks are detached; give in-flight provider
    // calls a bounded period to finalize their job records.
    tracing::info!(
        drain_secs = config.shutdown_timeout_secs,
        "Server stopped accepting connections, draining background tasks",
    );
    tokio::time::sleep(Duration::from_secs(config.shutdown_timeout_secs)).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
