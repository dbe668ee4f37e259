//! Object store implementations - S3 and in-memory fallback.

mod memory;

pub use memory::InMemoryObjectStore;

#[cfg(feature = "s3")]
mod s3;
#[cfg(feature = "s3")]
pub use s3::{S3Config, S3ObjectStore};
