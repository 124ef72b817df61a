/// Errors from the provider integration layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Every endpoint and retry attempt was exhausted on transient
    /// failures (DNS, connect, timeout, reset, 429/5xx).
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider rejected the request at the application level
    /// (non-retryable HTTP status). Never retried, never falls over to
    /// an alternate endpoint.
    #[error("Provider rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The provider explicitly reported the generation as failed.
    /// The message is preserved verbatim for diagnostics.
    #[error("Generation failed: {0}")]
    Generation(String),

    /// The provider returned a body that fits no known response shape.
    #[error("Unexpected provider response: {0}")]
    Response(String),

    /// No configured provider matches the requested name or job kind.
    #[error("No provider configured: {0}")]
    NotConfigured(String),
}
