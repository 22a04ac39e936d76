use actix_web::{web, HttpRequest, HttpResponse};
use sh_core::errors::TokenError;
use sh_core::services::RevocationOutcome;
use tracing::{error, info};

use crate::dto::auth::LogoutResponse;
use crate::handlers::error::ApiError;
use crate::middleware::auth::extract_bearer_token;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented token. Not wrapped in `JwtAuth`: an expired or
/// unparseable token has nothing left to revoke and still logs out.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "message": "Logged out" }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: No bearer token
/// - 503 Service Unavailable: The revocation was not recorded and the token
///   is still valid
pub async fn logout(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let token = extract_bearer_token(req.headers())
        .ok_or(ApiError::Unauthorized(TokenError::MissingToken))?;

    match state.auth_service.logout(&token).await {
        Ok(RevocationOutcome::Revoked { token_id, .. }) => {
            info!(token_id = %token_id.short(), "Session logged out");
        }
        Ok(RevocationOutcome::NothingToRevoke { reason }) => {
            info!(reason = reason.reason_code(), "Logout with inactive token");
        }
        Err(err) => {
            error!(error = %err, "Logout failed");
            return Err(err.into());
        }
    }

    Ok(HttpResponse::Ok().json(LogoutResponse::default()))
}
