//! Request and response bodies for the auth endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sh_core::domain::entities::{IssuedToken, Role};
use validator::Validate;

use crate::middleware::auth::AuthContext;

/// Request body for POST /api/v1/auth/login
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 128, message = "Username must be 1-128 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 256, message = "Password must be 1-256 characters"))]
    pub password: String,
}

/// Response body for a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub role: Role,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            expires_in: issued.expires_in(),
            expires_at: issued.expires_at,
            role: issued.role,
            access_token: issued.access_token,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Response body for POST /api/v1/auth/logout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

impl Default for LogoutResponse {
    fn default() -> Self {
        Self {
            message: "Logged out".to_string(),
        }
    }
}

/// Verified identity returned by GET /api/v1/session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub subject_id: String,
    pub role: Role,
}

impl From<AuthContext> for SessionResponse {
    fn from(context: AuthContext) -> Self {
        Self {
            subject_id: context.subject_id,
            role: context.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// `up` or `down`
    pub revocation_store: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = LoginRequest {
            username: String::new(),
            password: "secret".to_string(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_logout_response_body() {
        let json = serde_json::to_value(LogoutResponse::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Logged out" }));
    }
}
