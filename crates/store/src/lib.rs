//! Durable record and blob store boundary for mediaforge.
//!
//! The orchestrator treats storage as a generic CRUD collaborator. This
//! crate defines that seam:
//!
//! - [`JobStore`] — per-id atomic create/get/update/list for job
//!   records. Updates are expressed as a [`JobPatch`] and applied
//!   through the state-machine guard, so terminal-state immutability is
//!   enforced at the storage boundary regardless of the backend.
//! - [`BlobStore`] — `put(bytes, content_type) -> url` for artifacts.
//! - [`MemoryStore`] / [`MemoryBlobStore`] — in-memory backends used by
//!   tests and single-node deployments.
//! - [`FsBlobStore`] — filesystem artifact persistence served under a
//!   public base path.

pub mod blob;
pub mod error;
pub mod job_store;
pub mod memory;
pub mod patch;

pub use blob::{BlobStore, FsBlobStore, MemoryBlobStore, StoredBlob};
pub use error::StoreError;
pub use job_store::{JobFilter, JobStore};
pub use memory::MemoryStore;
pub use patch::JobPatch;
