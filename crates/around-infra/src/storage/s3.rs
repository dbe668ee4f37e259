//! S3 object store for post images.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;

use around_core::domain::Attachment;
use around_core::error::StorageError;
use around_core::ports::ObjectStore;

/// S3 connection settings.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for MinIO/LocalStack.
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    /// Base URL objects are served from (CDN), if not S3 itself.
    pub public_base_url: Option<String>,
}

impl S3Config {
    /// URL under which `key` is publicly readable.
    pub fn public_url(&self, key: &str) -> String {
        if let Some(base) = &self.public_base_url {
            return format!("{}/{}", base.trim_end_matches('/'), key);
        }

        match &self.endpoint_url {
            Some(endpoint) if self.force_path_style => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            _ => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

/// `Content-Disposition` keeping the uploader's file name for downloads.
fn content_disposition(attachment: &Attachment) -> Option<String> {
    let name: String = attachment
        .file_name
        .as_deref()?
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"' && *c != '\\')
        .collect();
    if name.is_empty() {
        return None;
    }
    Some(format!("inline; filename=\"{name}\""))
}

/// Object store writing public-read objects into one S3 bucket.
pub struct S3ObjectStore {
    client: Client,
    config: S3Config,
}

impl S3ObjectStore {
    pub async fn new(config: S3Config) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = S3ConfigBuilder::from(&aws_config);
        if let Some(endpoint_url) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            "S3 object store initialized"
        );

        Self { client, config }
    }

    /// Verify the bucket exists and is reachable with the current credentials.
    pub async fn check_bucket(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| StorageError::Connection(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.config.bucket
    }

    async fn put_public(&self, name: &str, attachment: &Attachment) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(name)
            .body(ByteStream::from(attachment.bytes.clone()))
            .set_content_type(attachment.content_type.clone())
            .set_content_disposition(content_disposition(attachment))
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::Upload(DisplayErrorContext(e).to_string()))?;

        Ok(self.config.public_url(name))
    }

    async fn delete(&self, name: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.config.bucket)
            .key(name)
            .send()
            .await
            .map_err(|e| StorageError::Delete(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> S3Config {
        S3Config {
            bucket: "around-posts".to_string(),
            region: "us-west-2".to_string(),
            endpoint_url: None,
            force_path_style: false,
            public_base_url: None,
        }
    }

    #[test]
    fn test_virtual_hosted_url() {
        assert_eq!(
            config().public_url("abc"),
            "https://around-posts.s3.us-west-2.amazonaws.com/abc"
        );
    }

    #[test]
    fn test_path_style_url() {
        let config = S3Config {
            endpoint_url: Some("http://localhost:9000/".to_string()),
            force_path_style: true,
            ..config()
        };
        assert_eq!(config.public_url("abc"), "http://localhost:9000/around-posts/abc");
    }

    #[test]
    fn test_public_base_url_wins() {
        let config = S3Config {
            public_base_url: Some("https://cdn.example.com/media/".to_string()),
            endpoint_url: Some("http://localhost:9000".to_string()),
            force_path_style: true,
            ..config()
        };
        assert_eq!(config.public_url("abc"), "https://cdn.example.com/media/abc");
    }

    #[test]
    fn test_content_disposition_keeps_file_name() {
        let attachment = Attachment {
            file_name: Some("sunset \"beach\"\u{e9}.jpg".to_string()),
            ..Attachment::new(vec![1, 2, 3])
        };
        assert_eq!(
            content_disposition(&attachment).as_deref(),
            Some("inline; filename=\"sunset beach.jpg\"")
        );
    }

    #[test]
    fn test_content_disposition_absent_without_name() {
        assert_eq!(content_disposition(&Attachment::new(vec![1])), None);

        let blank = Attachment {
            file_name: Some("\"\"".to_string()),
            ..Attachment::new(vec![1])
        };
        assert_eq!(content_disposition(&blank), None);
    }
}
