//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Query string of `GET /search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    pub lat: f64,
    pub lon: f64,
    /// Radius in kilometres.
    pub range: Option<f64>,
}

/// A point as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResponse {
    pub lat: f64,
    pub lon: f64,
}

/// A post as returned by `GET /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub user: String,
    pub message: String,
    pub location: LocationResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Acknowledgement of `POST /post`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreatedResponse {
    pub id: String,
}
