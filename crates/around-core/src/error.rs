//! Domain-level error types.

use thiserror::Error;

/// Domain errors - failures of a single ingest or search request.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Image is not available")]
    MissingAttachment,

    #[error("Timed out during {operation}")]
    Timeout { operation: &'static str },

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Search index errors.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Search engine connection failed: {0}")]
    Connection(String),

    #[error("Search engine request failed: {0}")]
    Query(String),

    #[error("Search response could not be decoded: {0}")]
    Deserialize(String),

    #[error("Index {0} does not exist")]
    MissingIndex(String),
}

/// Object store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object store connection failed: {0}")]
    Connection(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Delete failed: {0}")]
    Delete(String),
}
