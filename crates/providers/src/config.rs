//! Provider credentials and endpoint configuration.
//!
//! Loaded from environment variables. A provider is configured when its
//! `*_API_KEY` is present; endpoint URLs default to the vendor's public
//! API and may carry one pre-registered fallback base URL.

/// Credentials and ordered endpoint list for one provider.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    pub api_key: String,
    /// Ordered base URLs, primary first.
    pub endpoints: Vec<String>,
}

/// Configuration for all known providers.
///
/// | Env var prefix   | Provider            |
/// |------------------|---------------------|
/// | `DIFFUSION_`     | diffusion (image)   |
/// | `PORTRAIT_`      | portrait (avatar)   |
/// | `TALKINGHEAD_`   | talking-head video  |
///
/// Each prefix reads `*_API_KEY` (required to enable the provider),
/// `*_API_URL` (optional, overrides the default base URL), and
/// `*_FALLBACK_URL` (optional alternate base URL tried after the
/// primary is exhausted).
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub diffusion: Option<ProviderCredentials>,
    pub portrait: Option<ProviderCredentials>,
    pub talking_head: Option<ProviderCredentials>,
}

impl ProviderConfig {
    /// Load provider configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            diffusion: credentials_from_env("DIFFUSION", "https://api.diffusion.example"),
            portrait: credentials_from_env("PORTRAIT", "https://api.portraitforge.example"),
            talking_head: credentials_from_env("TALKINGHEAD", "https://api.talkinghead.example"),
        }
    }

    /// Whether at least one provider is configured.
    pub fn any_configured(&self) -> bool {
        self.diffusion.is_some() || self.portrait.is_some() || self.talking_head.is_some()
    }
}

fn credentials_from_env(prefix: &str, default_url: &str) -> Option<ProviderCredentials> {
    let api_key = std::env::var(format!("{prefix}_API_KEY")).ok()?;

    let primary =
        std::env::var(format!("{prefix}_API_URL")).unwrap_or_else(|_| default_url.to_string());
    let mut endpoints = vec![primary];
    if let Ok(fallback) = std::env::var(format!("{prefix}_FALLBACK_URL")) {
        if !fallback.is_empty() {
            endpoints.push(fallback);
        }
    }

    Some(ProviderCredentials { api_key, endpoints })
}
