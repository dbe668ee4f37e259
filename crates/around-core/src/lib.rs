//! # Around Core
//!
//! The domain layer of the Around service: posts, locations, the ports that
//! infrastructure must implement, and the ingest/search pipelines built on them.
//! This crate has no knowledge of HTTP, Elasticsearch or S3.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
