//! HTTP error mapping
//!
//! Every verification rejection collapses into one 401 body so a caller
//! cannot tell an expired token from a revoked or forged one. The specific
//! reason is only logged. A failed revocation surfaces as a distinct 503 so
//! the client keeps its token instead of assuming the session ended.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sh_core::errors::{AuthError, DomainError, TokenError};
use sh_shared::{error_codes, ErrorResponse};
use thiserror::Error;
use tracing::error;

/// Errors returned by route handlers and the auth middleware
#[derive(Debug, Error)]
pub enum ApiError {
    /// Any verification-path rejection
    #[error("Unauthorized: {}", .0.reason_code())]
    Unauthorized(TokenError),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(String),

    /// The revocation was not recorded; the token is still valid
    #[error("Revocation failed: {0}")]
    RevocationFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Unauthorized(_) => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, "Authentication required")
            }
            ApiError::InvalidCredentials => ErrorResponse::new(
                error_codes::INVALID_CREDENTIALS,
                "Invalid username or password",
            ),
            ApiError::Validation(reason) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request")
                    .add_detail("reason", reason)
            }
            ApiError::RevocationFailed(_) => ErrorResponse::new(
                error_codes::REVOCATION_FAILED,
                "Logout could not be completed, the session is still active",
            ),
            ApiError::Internal(_) => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RevocationFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Token(TokenError::TokenGenerationFailed) => {
                error!("Token generation failed");
                ApiError::Internal("token generation failed".to_string())
            }
            DomainError::Token(reason) => ApiError::Unauthorized(reason),
            DomainError::Auth(AuthError::InvalidCredentials) => ApiError::InvalidCredentials,
            DomainError::Validation { message } => ApiError::Validation(message),
            DomainError::RevocationFailed { reason } => ApiError::RevocationFailed(reason),
            DomainError::Storage { message } | DomainError::Internal { message } => {
                error!(error = %message, "Request failed");
                ApiError::Internal(message)
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}
