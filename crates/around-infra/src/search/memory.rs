//! In-memory search index - used when no search engine is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;

use around_core::domain::{GeoDistanceQuery, Post, PostId};
use around_core::error::IndexError;
use around_core::ports::SearchIndex;

#[derive(Default)]
struct IndexState {
    created: bool,
    /// Documents in insertion order.
    docs: Vec<(PostId, Post)>,
}

/// Search index kept in process memory.
///
/// Geo-distance filtering uses the haversine distance.
/// Note: Data is lost on process restart.
pub struct InMemorySearchIndex {
    name: String,
    state: RwLock<IndexState>,
}

impl InMemorySearchIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(IndexState::default()),
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.state.read().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Look up a document by id.
    pub async fn get(&self, id: &PostId) -> Option<Post> {
        let state = self.state.read().await;
        state
            .docs
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, post)| post.clone())
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn exists(&self) -> Result<bool, IndexError> {
        Ok(self.state.read().await.created)
    }

    async fn create_with_geo_mapping(&self) -> Result<(), IndexError> {
        self.state.write().await.created = true;
        Ok(())
    }

    async fn put(&self, id: &PostId, post: &Post) -> Result<(), IndexError> {
        let mut state = self.state.write().await;
        if !state.created {
            return Err(IndexError::MissingIndex(self.name.clone()));
        }

        match state.docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            Some((_, existing)) => *existing = post.clone(),
            None => state.docs.push((*id, post.clone())),
        }
        Ok(())
    }

    async fn geo_distance(&self, query: &GeoDistanceQuery) -> Result<Vec<Post>, IndexError> {
        let state = self.state.read().await;
        if !state.created {
            return Err(IndexError::MissingIndex(self.name.clone()));
        }

        Ok(state
            .docs
            .iter()
            .map(|(_, post)| post)
            .filter(|post| query.matches(&post.location))
            .take(query.limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), IndexError> {
        Ok(())
    }
}
