//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub index: String,
    pub index_reachable: bool,
    pub timestamp: String,
}

/// Liveness check - returns server status.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    // Liveness only: an unreachable index is reported, not failed
    let index_reachable = match state.index.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Search index ping failed");
            false
        }
    };

    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        index: state.index.name().to_string(),
        index_reachable,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    HttpResponse::Ok().json(response)
}
