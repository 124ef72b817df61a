//! Provider integration layer for mediaforge.
//!
//! Every external generation backend plugs in behind the same pattern:
//! submit a request, poll a provider-assigned task handle until it
//! resolves, and hand back either raw bytes or a hosted URL.
//!
//! - [`provider`] — the [`Provider`](provider::Provider) trait and the
//!   request/handle/outcome types shared by all integrations.
//! - [`transport`] — one HTTP call with transient-error retry and
//!   ordered base-URL fallback.
//! - [`poll`] — the bounded poll-loop engine every integration reuses.
//! - [`registry`] — provider lookup and deterministic default selection.
//! - [`diffusion`], [`portrait`], [`talking_head`] — concrete clients.
//! - [`mock`] — scripted in-memory provider for tests.

pub mod config;
pub mod diffusion;
pub mod error;
pub mod mock;
pub mod poll;
pub mod portrait;
pub mod provider;
pub mod registry;
pub mod talking_head;
pub mod transport;
pub mod wire;

pub use config::{ProviderConfig, ProviderCredentials};
pub use error::ProviderError;
pub use poll::{poll_until_terminal, PollPlan, PollResult};
pub use provider::{
    GenerationRequest, PollOutcome, Provider, ProviderArtifact, ProviderOutput, TaskHandle,
};
pub use registry::ProviderRegistry;
pub use transport::Transport;
