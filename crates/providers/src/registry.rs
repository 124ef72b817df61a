//! Provider lookup and deterministic default selection.

use std::sync::Arc;

use mediaforge_core::job::JobKind;

use crate::config::ProviderConfig;
use crate::diffusion::DiffusionClient;
use crate::error::ProviderError;
use crate::portrait::PortraitClient;
use crate::provider::Provider;
use crate::talking_head::TalkingHeadClient;

/// Registry of configured providers.
///
/// Registration order is the fixed default-selection priority: when a
/// request names no provider, the first registered provider supporting
/// the job's kind is chosen. [`from_config`](Self::from_config)
/// registers in the order diffusion → portrait → talking-head, i.e.
/// the first configured credential wins.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configured credentials.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let mut registry = Self::new();
        if let Some(ref creds) = config.diffusion {
            registry.register(Arc::new(DiffusionClient::new(creds)));
        }
        if let Some(ref creds) = config.portrait {
            registry.register(Arc::new(PortraitClient::new(creds)));
        }
        if let Some(ref creds) = config.talking_head {
            registry.register(Arc::new(TalkingHeadClient::new(creds)));
        }
        registry
    }

    /// Append a provider. Order of registration is selection priority.
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        tracing::info!(provider = provider.name(), "Provider registered");
        self.providers.push(provider);
    }

    /// Look up a provider by its stable name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers
            .iter()
            .find(|p| p.name() == name)
            .map(Arc::clone)
    }

    /// Resolve the provider for a job.
    ///
    /// With an explicit name, that provider must exist and support the
    /// kind. Without one, the first registered provider supporting the
    /// kind is selected.
    pub fn select(
        &self,
        kind: JobKind,
        explicit: Option<&str>,
    ) -> Result<Arc<dyn Provider>, ProviderError> {
        match explicit {
            Some(name) => {
                let provider = self.get(name).ok_or_else(|| {
                    ProviderError::NotConfigured(format!("provider \"{name}\" is not configured"))
                })?;
                if !provider.supports(kind) {
                    return Err(ProviderError::NotConfigured(format!(
                        "provider \"{name}\" does not support {kind} jobs"
                    )));
                }
                Ok(provider)
            }
            None => self
                .providers
                .iter()
                .find(|p| p.supports(kind))
                .map(Arc::clone)
                .ok_or_else(|| {
                    ProviderError::NotConfigured(format!("no provider supports {kind} jobs"))
                }),
        }
    }

    /// Names of all registered providers, in priority order.
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
