//! Pipelines built on top of the ports.

mod bootstrap;
mod ingest;
mod search;

pub use bootstrap::{BootstrapOutcome, ensure_index};
pub use ingest::{IngestPipeline, IngestSettings};
pub use search::{SearchService, SearchSettings};

use std::future::Future;
use std::time::Duration;

use crate::error::DomainError;

/// Default bound on any single call to the index or object store.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Run an upstream call, giving up after `limit`.
async fn bounded<T, E>(
    limit: Duration,
    operation: &'static str,
    call: impl Future<Output = Result<T, E>>,
) -> Result<T, DomainError>
where
    DomainError: From<E>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(DomainError::from),
        Err(_) => {
            tracing::warn!(operation, timeout_ms = limit.as_millis() as u64, "Upstream call timed out");
            Err(DomainError::Timeout { operation })
        }
    }
}
