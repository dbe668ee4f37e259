//! In-memory object store - used when no bucket is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use around_core::domain::Attachment;
use around_core::error::StorageError;
use around_core::ports::ObjectStore;

/// Object store kept in process memory.
///
/// Note: Data is lost on process restart, and the returned URLs are not
/// reachable from outside the process.
pub struct InMemoryObjectStore {
    bucket: String,
    objects: RwLock<HashMap<String, Attachment>>,
}

impl InMemoryObjectStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn url_for(&self, name: &str) -> String {
        format!("memory://{}/{}", self.bucket, name)
    }

    pub async fn get(&self, name: &str) -> Option<Attachment> {
        self.objects.read().await.get(name).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_public(&self, name: &str, attachment: &Attachment) -> Result<String, StorageError> {
        self.objects
            .write()
            .await
            .insert(name.to_string(), attachment.clone());
        Ok(self.url_for(name))
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.objects.write().await.remove(name);
        Ok(())
    }
}
