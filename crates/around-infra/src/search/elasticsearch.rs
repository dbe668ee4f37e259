//! Elasticsearch-backed search index.

use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::{
    Elasticsearch, IndexParts, SearchParts,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use around_core::domain::{GeoDistanceQuery, Post, PostId};
use around_core::error::IndexError;
use around_core::ports::SearchIndex;

/// Elasticsearch connection settings.
#[derive(Debug, Clone)]
pub struct ElasticsearchConfig {
    pub url: String,
    pub index: String,
    /// Per-request transport timeout.
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct ElasticsearchIndex {
    client: Elasticsearch,
    index: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    took: u64,
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    total: Option<TotalHits>,
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct TotalHits {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: Post,
}

/// Index body declaring `location` as a geo-point.
pub fn geo_point_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "location": { "type": "geo_point" }
            }
        }
    })
}

/// Search body filtering on distance from the query center.
pub fn geo_distance_body(query: &GeoDistanceQuery) -> Value {
    json!({
        "size": query.limit,
        "query": {
            "bool": {
                "filter": {
                    "geo_distance": {
                        "distance": query.radius.to_string(),
                        "location": {
                            "lat": query.center.lat,
                            "lon": query.center.lon
                        }
                    }
                }
            }
        }
    })
}

impl ElasticsearchIndex {
    pub fn connect(config: &ElasticsearchConfig) -> Result<Self, IndexError> {
        let parsed = Url::parse(&config.url).map_err(|e| {
            IndexError::Connection(format!("invalid Elasticsearch URL {}: {}", config.url, e))
        })?;
        let pool = SingleNodeConnectionPool::new(parsed);
        let transport = TransportBuilder::new(pool)
            .timeout(config.timeout)
            .build()
            .map_err(|e| IndexError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, index = %config.index, "Elasticsearch client initialized");

        Ok(Self {
            client: Elasticsearch::new(transport),
            index: config.index.clone(),
        })
    }

    /// Turn a non-2xx response into an error carrying the engine's message.
    async fn check(response: Response, action: &str) -> Result<Response, IndexError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(IndexError::Query(format!("{action} returned {status}: {body}")))
    }
}

fn transport_error(e: elasticsearch::Error) -> IndexError {
    IndexError::Connection(e.to_string())
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    fn name(&self) -> &str {
        &self.index
    }

    async fn exists(&self) -> Result<bool, IndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[self.index.as_str()]))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status_code().as_u16() {
            200..=299 => Ok(true),
            404 => Ok(false),
            _ => Self::check(response, "index exists").await.map(|_| false),
        }
    }

    async fn create_with_geo_mapping(&self) -> Result<(), IndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(geo_point_mapping())
            .send()
            .await
            .map_err(transport_error)?;

        if response.status_code().is_success() {
            return Ok(());
        }

        let status = response.status_code();
        let body = response.text().await.unwrap_or_default();
        if body.contains("resource_already_exists_exception") {
            tracing::debug!(index = %self.index, "Index was created concurrently");
            return Ok(());
        }

        Err(IndexError::Query(format!(
            "create index returned {status}: {body}"
        )))
    }

    async fn put(&self, id: &PostId, post: &Post) -> Result<(), IndexError> {
        let id = id.to_string();
        let response = self
            .client
            .index(IndexParts::IndexId(&self.index, &id))
            .body(post)
            .refresh(Refresh::True)
            .send()
            .await
            .map_err(transport_error)?;

        Self::check(response, "index document").await?;
        Ok(())
    }

    async fn geo_distance(&self, query: &GeoDistanceQuery) -> Result<Vec<Post>, IndexError> {
        let response = self
            .client
            .search(SearchParts::Index(&[self.index.as_str()]))
            .body(geo_distance_body(query))
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check(response, "search").await?;
        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Deserialize(e.to_string()))?;

        tracing::debug!(
            took_ms = result.took,
            total = result.hits.total.as_ref().map(|t| t.value).unwrap_or_default(),
            "Geo-distance query finished"
        );

        Ok(result.hits.hits.into_iter().map(|hit| hit.source).collect())
    }

    async fn ping(&self) -> Result<(), IndexError> {
        let response = self.client.ping().send().await.map_err(transport_error)?;
        Self::check(response, "ping").await?;
        Ok(())
    }
}
