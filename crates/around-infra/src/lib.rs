//! # Around Infrastructure
//!
//! Concrete implementations of the ports defined in `around-core`.
//! This crate contains the search engine, object store, and token integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `elasticsearch` - Search index backed by Elasticsearch
//! - `s3` - Object store backed by S3 (or an S3-compatible endpoint)
//! - `auth` - JWT token validation

pub mod search;
pub mod storage;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use search::InMemorySearchIndex;
pub use storage::InMemoryObjectStore;

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "elasticsearch")]
pub use search::{ElasticsearchConfig, ElasticsearchIndex};

#[cfg(feature = "s3")]
pub use storage::{S3Config, S3ObjectStore};
