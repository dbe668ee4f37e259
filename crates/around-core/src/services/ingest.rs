use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Post, PostId, PostSubmission};
use crate::error::DomainError;
use crate::ports::{ObjectStore, SearchIndex};

use super::{DEFAULT_UPSTREAM_TIMEOUT, bounded};

/// Ingest pipeline settings.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Reject submissions that carry no image.
    pub require_attachment: bool,
    pub upstream_timeout: Duration,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            require_attachment: true,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
        }
    }
}

/// Turns a submission into an indexed post.
pub struct IngestPipeline {
    index: Arc<dyn SearchIndex>,
    store: Arc<dyn ObjectStore>,
    settings: IngestSettings,
}

impl IngestPipeline {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        store: Arc<dyn ObjectStore>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            index,
            store,
            settings,
        }
    }

    /// Store the attachment (if any) and index the post under a fresh id.
    ///
    /// If the index write fails after the upload succeeded, the uploaded
    /// object is removed again before the error is returned. A timed-out
    /// index write leaves the object in place.
    #[tracing::instrument(skip(self, submission), fields(post_id = tracing::field::Empty))]
    pub async fn ingest(
        &self,
        author: &str,
        submission: PostSubmission,
    ) -> Result<PostId, DomainError> {
        let PostSubmission {
            message,
            location,
            attachment,
        } = submission;

        if attachment.is_none() && self.settings.require_attachment {
            tracing::warn!("Rejecting post without image");
            return Err(DomainError::MissingAttachment);
        }

        let id = PostId::generate();
        tracing::Span::current().record("post_id", tracing::field::display(&id));
        let object_name = id.to_string();

        let mut post = Post::new(author, message, location);

        let uploaded = match &attachment {
            Some(attachment) => {
                let url = bounded(
                    self.settings.upstream_timeout,
                    "object upload",
                    self.store.put_public(&object_name, attachment),
                )
                .await?;
                tracing::info!(
                    bucket = self.store.bucket(),
                    size_bytes = attachment.len(),
                    url = %url,
                    "Post image saved to object store"
                );
                post = post.with_url(url);
                true
            }
            None => false,
        };

        let indexed = bounded(
            self.settings.upstream_timeout,
            "index write",
            self.index.put(&id, &post),
        )
        .await;

        match indexed {
            Ok(()) => {}
            // The engine may still commit a write we stopped waiting for
            Err(err @ DomainError::Timeout { .. }) => {
                if uploaded {
                    tracing::warn!(object = %object_name, "Index write outcome unknown, keeping image");
                }
                return Err(err);
            }
            Err(err) => {
                if uploaded {
                    self.discard_object(&object_name).await;
                }
                return Err(err);
            }
        }

        tracing::info!(index = self.index.name(), message = %post.message, "Post saved to index");
        Ok(id)
    }

    async fn discard_object(&self, name: &str) {
        let result = bounded(
            self.settings.upstream_timeout,
            "object cleanup",
            self.store.delete(name),
        )
        .await;

        match result {
            Ok(()) => tracing::info!(object = name, "Removed image of unindexed post"),
            Err(e) => tracing::error!(object = name, error = %e, "Orphaned image left in object store"),
        }
    }
}
