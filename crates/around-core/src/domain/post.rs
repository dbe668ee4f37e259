use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Location;

/// Identifier of an indexed post. Also names the post's media object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// Post document - the shape stored in and returned by the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub user: String,
    pub message: String,
    pub location: Location,
    /// Public URL of the attached image, if one was uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Post {
    pub fn new(user: impl Into<String>, message: impl Into<String>, location: Location) -> Self {
        Self {
            user: user.into(),
            message: message.into(),
            location,
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Binary attachment received with a submission.
#[derive(Debug, Clone, Default)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

impl Attachment {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A decoded, not yet persisted post submission.
#[derive(Debug, Clone)]
pub struct PostSubmission {
    pub message: String,
    pub location: Location,
    pub attachment: Option<Attachment>,
}
