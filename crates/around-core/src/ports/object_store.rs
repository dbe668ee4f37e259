use async_trait::async_trait;

use crate::domain::Attachment;
use crate::error::StorageError;

/// Blob storage for post attachments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket the store writes into.
    fn bucket(&self) -> &str;

    /// Store `attachment` under `name`, readable by anyone, and return its URL.
    async fn put_public(&self, name: &str, attachment: &Attachment) -> Result<String, StorageError>;

    /// Remove the object stored under `name`.
    async fn delete(&self, name: &str) -> Result<(), StorageError>;
}
