//! Search index implementations - Elasticsearch and in-memory fallback.

mod memory;

pub use memory::InMemorySearchIndex;

#[cfg(feature = "elasticsearch")]
mod elasticsearch;
#[cfg(feature = "elasticsearch")]
pub use self::elasticsearch::{
    ElasticsearchConfig, ElasticsearchIndex, geo_distance_body, geo_point_mapping,
};
