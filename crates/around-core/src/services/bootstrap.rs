use crate::error::IndexError;
use crate::ports::SearchIndex;

/// What [`ensure_index`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Existing,
    Created,
}

/// Make sure the index exists with a geo-point `location` mapping.
///
/// Safe to call on every start. Any error here must stop the process from
/// serving traffic.
pub async fn ensure_index(index: &dyn SearchIndex) -> Result<BootstrapOutcome, IndexError> {
    if index.exists().await? {
        tracing::info!(index = index.name(), "Search index already exists");
        return Ok(BootstrapOutcome::Existing);
    }

    index.create_with_geo_mapping().await?;
    tracing::info!(index = index.name(), "Created search index with geo-point mapping");

    Ok(BootstrapOutcome::Created)
}
