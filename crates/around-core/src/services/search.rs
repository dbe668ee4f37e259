use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Distance, GeoDistanceQuery, Location, Post};
use crate::error::DomainError;
use crate::ports::SearchIndex;

use super::{DEFAULT_UPSTREAM_TIMEOUT, bounded};

/// Search service settings.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Radius used when the caller gives none.
    pub default_radius: Distance,
    /// Page size requested from the engine.
    pub max_results: usize,
    pub upstream_timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius: Distance::default(),
            max_results: 100,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}

/// Geo-proximity search over indexed posts.
pub struct SearchService {
    index: Arc<dyn SearchIndex>,
    settings: SearchSettings,
}

impl SearchService {
    pub fn new(index: Arc<dyn SearchIndex>, settings: SearchSettings) -> Self {
        Self { index, settings }
    }

    /// Build the geo-distance filter for a request.
    pub fn build_query(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
    ) -> Result<GeoDistanceQuery, DomainError> {
        let center = Location::new(lat, lon)?;
        let radius = match radius_km {
            Some(km) => Distance::from_km(km)?,
            None => self.settings.default_radius,
        };

        Ok(GeoDistanceQuery {
            center,
            radius,
            limit: self.settings.max_results,
        })
    }

    /// Posts within `radius_km` (or the default radius) of (`lat`, `lon`).
    ///
    /// Result order is whatever the engine returns.
    #[tracing::instrument(skip(self))]
    pub async fn search(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
    ) -> Result<Vec<Post>, DomainError> {
        let query = self.build_query(lat, lon, radius_km)?;
        tracing::debug!(radius = %query.radius, "Searching posts");

        let posts = bounded(
            self.settings.upstream_timeout,
            "geo search",
            self.index.geo_distance(&query),
        )
        .await?;

        tracing::info!(index = self.index.name(), hits = posts.len(), "Search completed");
        Ok(posts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::ports::MockSearchIndex;

    fn mock_index() -> MockSearchIndex {
        let mut index = MockSearchIndex::new();
        index.expect_name().return_const("around".to_string());
        index
    }

    fn service(index: MockSearchIndex) -> SearchService {
        SearchService::new(Arc::new(index), SearchSettings::default())
    }

    #[test]
    fn test_build_query_uses_default_radius() {
        let service = service(mock_index());

        let query = service.build_query(37.0, -122.0, None).unwrap();

        assert_eq!(query.radius.to_string(), "200km");
        assert_eq!(query.center, Location { lat: 37.0, lon: -122.0 });
        assert_eq!(query.limit, 100);
    }

    #[test]
    fn test_build_query_rejects_bad_input() {
        let service = service(mock_index());

        assert!(service.build_query(91.0, 0.0, None).is_err());
        assert!(service.build_query(0.0, 0.0, Some(0.0)).is_err());
        assert!(service.build_query(0.0, 0.0, Some(-1.0)).is_err());
    }

    #[tokio::test]
    async fn test_search_passes_radius_to_index() {
        let mut index = mock_index();
        index
            .expect_geo_distance()
            .withf(|query| query.radius.km() == 1.0 && query.center.lat == 37.0)
            .times(1)
            .returning(|query| Ok(vec![Post::new("alice", "hello", query.center)]));

        let posts = service(index).search(37.0, -122.0, Some(1.0)).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].user, "alice");
    }

    #[tokio::test]
    async fn test_empty_result_is_not_an_error() {
        let mut index = mock_index();
        index.expect_geo_distance().returning(|_| Ok(vec![]));

        let posts = service(index).search(0.0, 0.0, Some(1.0)).await.unwrap();
        assert!(posts.is_empty());
    }

    #[tokio::test]
    async fn test_index_failure_surfaces() {
        let mut index = mock_index();
        index
            .expect_geo_distance()
            .returning(|_| Err(IndexError::Query("search_phase_execution_exception".into())));

        let result = service(index).search(0.0, 0.0, None).await;
        assert!(matches!(result, Err(DomainError::Index(_))));
    }

    #[tokio::test]
    async fn test_invalid_center_never_reaches_index() {
        let mut index = mock_index();
        index.expect_geo_distance().never();

        let result = service(index).search(120.0, 0.0, None).await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
