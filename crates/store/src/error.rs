use mediaforge_core::types::JobId;

/// Errors from the record/blob storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No job record exists for the given id.
    #[error("Job {0} not found")]
    NotFound(JobId),

    /// A job with the same id already exists.
    #[error("Job {0} already exists")]
    AlreadyExists(JobId),

    /// The requested update violates the job state machine (e.g. a
    /// mutation of a terminal job, or an illegal status transition).
    #[error("Illegal job update: {0}")]
    IllegalUpdate(String),

    /// Blob persistence failed.
    #[error("Blob persistence failed: {0}")]
    Blob(String),

    /// Underlying I/O failure.
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
}
