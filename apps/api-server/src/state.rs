//! Application state - shared across all handlers.

use std::sync::Arc;

use around_core::error::IndexError;
use around_core::ports::{ObjectStore, SearchIndex};
use around_core::services::{
    IngestPipeline, IngestSettings, SearchService, SearchSettings, ensure_index,
};
use around_infra::{InMemoryObjectStore, InMemorySearchIndex};

use crate::config::{AppConfig, PostConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestPipeline>,
    pub search: Arc<SearchService>,
    pub index: Arc<dyn SearchIndex>,
    pub posts: PostConfig,
}

/// Failures that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("search index bootstrap failed: {0}")]
    Bootstrap(#[from] IndexError),
}

impl AppState {
    /// Connect the configured adapters and bootstrap the search index.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let index = build_index(config)?;
        let store = build_store(config).await;

        let outcome = ensure_index(index.as_ref()).await?;
        tracing::info!(index = index.name(), ?outcome, "Search index ready");

        let state = Self::from_parts(index, store, config);
        tracing::info!("Application state initialized");
        Ok(state)
    }

    /// Wire the pipelines over already-constructed adapters.
    pub fn from_parts(
        index: Arc<dyn SearchIndex>,
        store: Arc<dyn ObjectStore>,
        config: &AppConfig,
    ) -> Self {
        let ingest = IngestPipeline::new(
            index.clone(),
            store,
            IngestSettings {
                require_attachment: config.posts.require_image,
                upstream_timeout: config.upstream_timeout,
            },
        );
        let search = SearchService::new(
            index.clone(),
            SearchSettings {
                default_radius: config.index.default_radius,
                max_results: config.index.max_results,
                upstream_timeout: config.upstream_timeout,
            },
        );

        Self {
            ingest: Arc::new(ingest),
            search: Arc::new(search),
            index,
            posts: config.posts.clone(),
        }
    }
}

fn build_index(config: &AppConfig) -> Result<Arc<dyn SearchIndex>, IndexError> {
    match &config.index.url {
        #[cfg(feature = "elasticsearch")]
        Some(url) => {
            let es = around_infra::ElasticsearchIndex::connect(&around_infra::ElasticsearchConfig {
                url: url.clone(),
                index: config.index.name.clone(),
                timeout: config.upstream_timeout,
            })?;
            Ok(Arc::new(es))
        }
        #[cfg(not(feature = "elasticsearch"))]
        Some(_) => {
            tracing::warn!("ES_URL set but elasticsearch feature disabled - using in-memory index");
            Ok(Arc::new(InMemorySearchIndex::new(config.index.name.clone())))
        }
        None => {
            tracing::warn!("ES_URL not set. Running with in-memory search index.");
            Ok(Arc::new(InMemorySearchIndex::new(config.index.name.clone())))
        }
    }
}

async fn build_store(config: &AppConfig) -> Arc<dyn ObjectStore> {
    match &config.storage {
        #[cfg(feature = "s3")]
        Some(storage) => {
            let store = around_infra::S3ObjectStore::new(around_infra::S3Config {
                bucket: storage.bucket.clone(),
                region: storage.region.clone(),
                endpoint_url: storage.endpoint_url.clone(),
                force_path_style: storage.force_path_style,
                public_base_url: storage.public_base_url.clone(),
            })
            .await;
            if let Err(e) = store.check_bucket().await {
                tracing::warn!(bucket = %storage.bucket, error = %e, "Bucket check failed; uploads may fail");
            }
            Arc::new(store)
        }
        #[cfg(not(feature = "s3"))]
        Some(storage) => {
            tracing::warn!("S3_BUCKET set but s3 feature disabled - using in-memory object store");
            Arc::new(InMemoryObjectStore::new(storage.bucket.clone()))
        }
        None => {
            tracing::warn!("S3_BUCKET not set. Images are kept in memory only.");
            Arc::new(InMemoryObjectStore::new("around-local"))
        }
    }
}
