//! Artifact ingestion: classify, persist, and describe provider output.
//!
//! Given raw bytes, the ingestor sniffs the content type from magic
//! numbers, takes dimensions from the request's aspect-ratio mapping
//! (never from decoding), and persists to the blob store. Given a
//! remote URL, it fetches the bytes exactly once; if either the fetch
//! or the local persistence fails, the remote URL is stored verbatim —
//! a usable hosted artifact must never fail the job.

use std::sync::Arc;

use mediaforge_core::job::{JobResult, ResultMetadata};
use mediaforge_core::sniff;
use mediaforge_providers::ProviderArtifact;
use mediaforge_store::BlobStore;

use crate::error::OrchestratorError;

/// Persists provider output and produces [`JobResult`] entries.
pub struct ArtifactIngestor {
    blobs: Arc<dyn BlobStore>,
    http: reqwest::Client,
}

impl ArtifactIngestor {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            http: reqwest::Client::new(),
        }
    }

    /// Ingest one provider artifact.
    ///
    /// `filename_stem` names the artifact (an extension is appended
    /// from the sniffed type); `dimensions` come from the job's
    /// aspect-ratio mapping.
    pub async fn ingest(
        &self,
        artifact: &ProviderArtifact,
        filename_stem: &str,
        dimensions: (u32, u32),
    ) -> Result<JobResult, OrchestratorError> {
        match artifact {
            ProviderArtifact::Inline { bytes } => {
                self.ingest_bytes(bytes, filename_stem, dimensions).await
            }
            ProviderArtifact::Remote { url } => {
                Ok(self.ingest_remote(url, filename_stem, dimensions).await)
            }
        }
    }

    /// Persist raw bytes. A blob-store failure here is fatal for the
    /// artifact: there is no remote fallback to point at.
    pub async fn ingest_bytes(
        &self,
        bytes: &[u8],
        filename_stem: &str,
        dimensions: (u32, u32),
    ) -> Result<JobResult, OrchestratorError> {
        let content_type = sniff::sniff_content_type(bytes);
        let filename = format!("{filename_stem}.{}", sniff::extension_for(content_type));

        let blob = self.blobs.put(bytes, content_type, &filename).await?;

        Ok(JobResult {
            url: blob.url,
            filename,
            format: content_type.to_string(),
            size_bytes: bytes.len() as u64,
            metadata: ResultMetadata {
                artifact_id: Some(blob.id),
                width: Some(dimensions.0),
                height: Some(dimensions.1),
            },
        })
    }

    /// Fetch a provider-hosted artifact once and persist it locally,
    /// falling back to the remote URL verbatim on any failure.
    pub async fn ingest_remote(
        &self,
        url: &str,
        filename_stem: &str,
        dimensions: (u32, u32),
    ) -> JobResult {
        match self.fetch_once(url).await {
            Ok(bytes) => match self.ingest_bytes(&bytes, filename_stem, dimensions).await {
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!(
                        %url,
                        error = %e,
                        "Local persistence failed, keeping remote artifact URL",
                    );
                }
            },
            Err(e) => {
                tracing::warn!(
                    %url,
                    error = %e,
                    "Artifact fetch failed, keeping remote artifact URL",
                );
            }
        }

        remote_fallback(url, dimensions)
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, OrchestratorError> {
        let response = self.http.get(url).send().await.map_err(|e| {
            OrchestratorError::Core(mediaforge_core::error::CoreError::Internal(format!(
                "artifact fetch from {url} failed: {e}"
            )))
        })?;

        let response = response.error_for_status().map_err(|e| {
            OrchestratorError::Core(mediaforge_core::error::CoreError::Internal(format!(
                "artifact fetch from {url} failed: {e}"
            )))
        })?;

        let bytes = response.bytes().await.map_err(|e| {
            OrchestratorError::Core(mediaforge_core::error::CoreError::Internal(format!(
                "artifact fetch from {url} failed: {e}"
            )))
        })?;

        Ok(bytes.to_vec())
    }
}

/// Build the verbatim-remote-URL result used when local persistence is
/// unavailable. Size is unknown without the bytes; format is guessed
/// from the URL extension.
fn remote_fallback(url: &str, dimensions: (u32, u32)) -> JobResult {
    let filename = url
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("artifact")
        .to_string();

    let format = sniff::content_type_for_name(&filename);

    JobResult {
        url: url.to_string(),
        filename,
        format: format.to_string(),
        size_bytes: 0,
        metadata: ResultMetadata {
            artifact_id: None,
            width: Some(dimensions.0),
            height: Some(dimensions.1),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
