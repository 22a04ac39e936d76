use actix_web::{web, HttpResponse};
use tracing::warn;
use validator::Validate;

use crate::dto::auth::{LoginRequest, LoginResponse};
use crate::handlers::error::ApiError;

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Checks the credentials against the staff directory and issues a token.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "alice",
///     "password": "correct horse battery staple"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "token_type": "Bearer",
///     "expires_in": 3600,
///     "expires_at": "2026-03-02T10:00:00Z",
///     "role": "admin"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing or oversized username or password
/// - 401 Unauthorized: Unknown user or wrong password
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    if let Err(errors) = request.validate() {
        warn!("Login request failed validation");
        return Err(errors.into());
    }

    let issued = state
        .auth_service
        .login(&request.username, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(LoginResponse::from(issued)))
}
