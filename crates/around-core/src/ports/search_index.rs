use async_trait::async_trait;

use crate::domain::{GeoDistanceQuery, Post, PostId};
use crate::error::IndexError;

/// Document store holding posts, keyed by id and searchable by distance.
///
/// Every implementation is bound to a single index name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Name of the index this client reads and writes.
    fn name(&self) -> &str;

    /// Check whether the index exists.
    async fn exists(&self) -> Result<bool, IndexError>;

    /// Create the index with `location` mapped as a geo-point.
    ///
    /// Losing a creation race against another process is not an error.
    async fn create_with_geo_mapping(&self) -> Result<(), IndexError>;

    /// Write `post` under `id` and refresh so it is immediately searchable.
    async fn put(&self, id: &PostId, post: &Post) -> Result<(), IndexError>;

    /// Return posts whose location matches the geo-distance filter.
    async fn geo_distance(&self, query: &GeoDistanceQuery) -> Result<Vec<Post>, IndexError>;

    /// Check that the engine is reachable.
    async fn ping(&self) -> Result<(), IndexError>;
}
