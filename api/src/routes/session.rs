use actix_web::HttpResponse;

use crate::dto::auth::SessionResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/session
///
/// Returns the identity admitted by `JwtAuth`.
pub async fn current_session(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse::from(auth))
}
