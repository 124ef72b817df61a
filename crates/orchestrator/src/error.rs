use mediaforge_core::error::CoreError;
use mediaforge_providers::ProviderError;
use mediaforge_store::StoreError;

/// Errors surfaced by orchestrator operations.
///
/// Only the synchronous surface (`submit`, `cancel`, `retry`,
/// `get_status`, `list`) returns these; generation-time errors never
/// propagate to a caller — they finalize the job record instead.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
