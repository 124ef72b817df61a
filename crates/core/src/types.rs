//! Shared primitive type aliases.

/// Unique identifier for a job record (UUID v4, assigned at creation).
pub type JobId = uuid::Uuid;

/// Identifier of the requesting principal, supplied by the external
/// auth layer and trusted as-is.
pub type UserId = uuid::Uuid;

/// Unique identifier for a persisted artifact.
pub type ArtifactId = uuid::Uuid;

/// UTC timestamp used for all lifecycle bookkeeping.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
