//! Blob/artifact persistence boundary.
//!
//! The artifact ingestor hands raw bytes to a [`BlobStore`] and gets a
//! stable retrieval URL back. Two backends are provided: an in-memory
//! one for tests and a filesystem one whose files are served under a
//! public base path by the API.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use mediaforge_core::types::ArtifactId;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// A persisted blob: its stable id and retrieval URL.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub id: ArtifactId,
    pub url: String,
}

/// Artifact byte persistence.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` under `filename` and return a stable reference.
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
        filename: &str,
    ) -> Result<StoredBlob, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// In-memory blob store used by the test harness.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<ArtifactId, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored byte payload for an artifact id. Test helper.
    pub async fn bytes(&self, id: ArtifactId) -> Option<Vec<u8>> {
        self.blobs.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        bytes: &[u8],
        _content_type: &str,
        filename: &str,
    ) -> Result<StoredBlob, StoreError> {
        let id = uuid::Uuid::new_v4();
        self.blobs.write().await.insert(id, bytes.to_vec());
        Ok(StoredBlob {
            id,
            url: format!("memory://artifacts/{id}/{filename}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Filesystem backend
// ---------------------------------------------------------------------------

/// Filesystem blob store.
///
/// Writes artifacts under `root` and returns URLs under `public_base`
/// (e.g. `/media`), which the API serves with a static-file layer.
pub struct FsBlobStore {
    root: PathBuf,
    public_base: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    /// Directory the artifacts are written to.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(
        &self,
        bytes: &[u8],
        content_type: &str,
        filename: &str,
    ) -> Result<StoredBlob, StoreError> {
        let id = uuid::Uuid::new_v4();
        // Prefix with the artifact id so caller-supplied names can never
        // collide or escape the root.
        let safe_name = filename.replace(['/', '\\'], "_");
        let disk_name = format!("{id}-{safe_name}");

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&disk_name), bytes).await?;

        tracing::debug!(
            artifact_id = %id,
            content_type,
            size_bytes = bytes.len(),
            "Artifact persisted to disk",
        );

        Ok(StoredBlob {
            id,
            url: format!("{}/{disk_name}", self.public_base),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_put_stores_bytes() {
        let store = MemoryBlobStore::new();
        let blob = store.put(b"abc", "image/png", "out.png").await.unwrap();
        assert_eq!(store.bytes(blob.id).await.as_deref(), Some(&b"abc"[..]));
        assert!(blob.url.contains("out.png"));
    }

    #[tokio::test]
    async fn fs_put_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "/media");

        let blob = store.put(b"payload", "image/png", "fox.png").await.unwrap();
        assert!(blob.url.starts_with("/media/"));
        assert!(blob.url.ends_with("fox.png"));

        let disk_name = blob.url.strip_prefix("/media/").unwrap();
        let written = tokio::fs::read(dir.path().join(disk_name)).await.unwrap();
        assert_eq!(written, b"payload");
    }

    #[tokio::test]
    async fn fs_put_sanitizes_path_separators() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "/media");

        let blob = store
            .put(b"x", "image/png", "../evil.png")
            .await
            .unwrap();

        // The on-disk name must be a single path component under /media.
        let disk_name = blob.url.strip_prefix("/media/").unwrap();
        assert!(!disk_name.contains('/'));
        assert!(disk_name.ends_with(".._evil.png"));
    }
}
