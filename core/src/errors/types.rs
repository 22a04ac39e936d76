//! Error types for authentication and token verification
//!
//! The verification taxonomy lives in `TokenError`. Callers see a uniform
//! "unauthorized" response for all of its variants; the specific variant is
//! kept for logging through `reason_code`.

use thiserror::Error;

/// Authentication errors raised on the login path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password, deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Token verification and issuance errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token revoked")]
    Revoked,

    #[error("Revocation store unavailable")]
    StorageUnavailable,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Stable code for structured logs
    pub fn reason_code(&self) -> &'static str {
        match self {
            TokenError::MissingToken => "missing_token",
            TokenError::Malformed => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
            TokenError::Revoked => "revoked",
            TokenError::StorageUnavailable => "storage_unavailable",
            TokenError::TokenGenerationFailed => "token_generation_failed",
        }
    }
}
