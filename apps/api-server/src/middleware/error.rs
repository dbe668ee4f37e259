//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use around_core::DomainError;
use around_shared::ErrorResponse;
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    PayloadTooLarge(usize),
    Internal(String),
    GatewayTimeout(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::PayloadTooLarge(limit) => write!(f, "Payload larger than {} bytes", limit),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::GatewayTimeout(msg) => write!(f, "Upstream timeout: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::PayloadTooLarge(limit) => ErrorResponse::payload_too_large(*limit),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error().with_detail(detail)
            }
            AppError::GatewayTimeout(detail) => {
                tracing::error!("Upstream timeout: {}", detail);
                ErrorResponse::gateway_timeout().with_detail(detail)
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::MissingAttachment => AppError::Internal(err.to_string()),
            DomainError::Timeout { operation } => AppError::GatewayTimeout(operation.to_string()),
            DomainError::Index(e) => {
                tracing::error!("Search index error: {}", e);
                AppError::Internal("Search index error".to_string())
            }
            DomainError::Storage(e) => {
                tracing::error!("Object store error: {}", e);
                AppError::Internal("Object store error".to_string())
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
