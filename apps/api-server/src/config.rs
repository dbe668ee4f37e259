//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use around_core::domain::Distance;
use around_infra::JwtConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub index: IndexConfig,
    pub storage: Option<StorageConfig>,
    pub jwt: JwtConfig,
    pub posts: PostConfig,
    /// Bound on every call to the search engine or object store.
    pub upstream_timeout: Duration,
}

/// Search engine settings.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Elasticsearch endpoint. The in-memory index is used when unset.
    pub url: Option<String>,
    pub name: String,
    pub default_radius: Distance,
    pub max_results: usize,
}

/// Object store settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub public_base_url: Option<String>,
}

/// Post submission limits.
#[derive(Debug, Clone)]
pub struct PostConfig {
    pub require_image: bool,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let storage = non_empty("S3_BUCKET").map(|bucket| StorageConfig {
            bucket,
            region: non_empty("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            endpoint_url: non_empty("S3_ENDPOINT_URL"),
            force_path_style: flag("S3_FORCE_PATH_STYLE", false),
            public_base_url: non_empty("S3_PUBLIC_BASE_URL"),
        });

        let default_radius = parsed::<f64>("DEFAULT_SEARCH_RADIUS_KM")
            .and_then(|km| Distance::from_km(km).ok())
            .unwrap_or_default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT").unwrap_or(8080),
            index: IndexConfig {
                url: non_empty("ES_URL"),
                name: non_empty("INDEX_NAME").unwrap_or_else(|| "around".to_string()),
                default_radius,
                max_results: parsed("SEARCH_MAX_RESULTS").unwrap_or(100),
            },
            storage,
            jwt: JwtConfig::from_env(),
            posts: PostConfig {
                require_image: flag("REQUIRE_IMAGE", true),
                max_upload_bytes: parsed("MAX_UPLOAD_BYTES").unwrap_or(32 << 20),
            },
            upstream_timeout: Duration::from_secs(parsed("UPSTREAM_TIMEOUT_SECS").unwrap_or(10)),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(default)
}
