//! Authentication ports.

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

/// Validates bearer tokens. Token issuance lives outside this service.
pub trait TokenService: Send + Sync {
    /// Validate a token's signature and expiry and extract its principal.
    fn validate_token(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is missing the {0} claim")]
    MissingClaim(&'static str),

    #[error("Missing authorization header")]
    MissingAuth,
}
