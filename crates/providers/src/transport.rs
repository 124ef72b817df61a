//! One HTTP call with transient-error retry and base-URL fallback.
//!
//! Each provider registers an ordered list of base URLs. A request is
//! attempted against the first endpoint up to a fixed attempt budget
//! with linearly increasing backoff, then falls over to the next
//! endpoint and repeats. Only transient failures trigger retry or
//! fallback; an application-level rejection (non-retryable HTTP status)
//! is returned immediately.

use std::time::Duration;

use crate::error::ProviderError;

/// Default per-endpoint attempt budget.
pub const DEFAULT_ATTEMPTS_PER_ENDPOINT: u32 = 3;

/// Default base delay; attempt `n` waits `n * base` before retrying.
pub const DEFAULT_BASE_BACKOFF: Duration = Duration::from_millis(500);

/// HTTP transport for a single provider.
pub struct Transport {
    client: reqwest::Client,
    /// Ordered base URLs, primary first.
    endpoints: Vec<String>,
    /// Bearer token sent with every request, when configured.
    api_key: Option<String>,
    attempts_per_endpoint: u32,
    base_backoff: Duration,
}

impl Transport {
    /// Create a transport over an ordered endpoint list.
    pub fn new(endpoints: Vec<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
            api_key,
            attempts_per_endpoint: DEFAULT_ATTEMPTS_PER_ENDPOINT,
            base_backoff: DEFAULT_BASE_BACKOFF,
        }
    }

    /// Override the retry budget and backoff base (tests use tiny values).
    pub fn with_retry(mut self, attempts_per_endpoint: u32, base_backoff: Duration) -> Self {
        self.attempts_per_endpoint = attempts_per_endpoint.max(1);
        self.base_backoff = base_backoff;
        self
    }

    /// Reuse an existing [`reqwest::Client`] (connection pooling across
    /// providers).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// `POST {endpoint}{path}` with a JSON body, returning the parsed
    /// JSON response.
    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        self.execute(path, Some(body)).await
    }

    /// `GET {endpoint}{path}`, returning the parsed JSON response.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, ProviderError> {
        self.execute(path, None).await
    }

    /// Try every endpoint in order with per-endpoint retry.
    async fn execute(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ProviderError> {
        let mut last_error = String::new();

        for (endpoint_idx, endpoint) in self.endpoints.iter().enumerate() {
            for attempt in 1..=self.attempts_per_endpoint {
                let url = format!("{endpoint}{path}");

                match self.send_once(&url, body).await {
                    Ok(value) => {
                        if endpoint_idx > 0 || attempt > 1 {
                            tracing::info!(
                                %url,
                                endpoint_idx,
                                attempt,
                                "Request succeeded after retry/fallback",
                            );
                        }
                        return Ok(value);
                    }
                    // Definitive answer: do not retry, do not fall over.
                    Err(SendError::Rejected { status, body }) => {
                        return Err(ProviderError::Rejected { status, body });
                    }
                    Err(SendError::Transient(msg)) => {
                        tracing::warn!(
                            %url,
                            endpoint_idx,
                            attempt,
                            error = %msg,
                            "Transient provider failure",
                        );
                        last_error = msg;
                    }
                }

                // Linear backoff before the next attempt on this endpoint.
                if attempt < self.attempts_per_endpoint {
                    tokio::time::sleep(self.base_backoff * attempt).await;
                }
            }
        }

        Err(ProviderError::Unavailable(format!(
            "all {} endpoint(s) exhausted after {} attempt(s) each; last error: {last_error}",
            self.endpoints.len(),
            self.attempts_per_endpoint,
        )))
    }

    /// One request against one concrete URL.
    async fn send_once(
        &self,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, SendError> {
        let mut request = match body {
            Some(json) => self.client.post(url).json(json),
            None => self.client.get(url),
        };
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            // DNS failures, refused connections, resets, and timeouts
            // all surface through these reqwest classifications.
            SendError::Transient(e.to_string())
        })?;

        let status = response.status();
        if is_retryable_status(status.as_u16()) {
            return Err(SendError::Transient(format!("HTTP {status} from {url}")));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| SendError::Transient(format!("invalid JSON from {url}: {e}")))
    }
}

/// Internal per-request error split: retryable vs. definitive.
enum SendError {
    Transient(String),
    Rejected { status: u16, body: String },
}

/// Whether an HTTP status is in the retryable-transient class.
///
/// 429 is the provider's own rate limit; 5xx is upstream breakage. Both
/// are worth retrying. Everything else non-2xx is an application-level
/// rejection.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
