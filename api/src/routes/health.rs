use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::dto::auth::HealthResponse;
use crate::routes::auth::AppState;

/// Health check endpoint handler
///
/// Reports 503 while the revocation store is unreachable, since every
/// protected request is rejected in that state.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_up = state.token_service.check_storage().await.is_ok();

    let body = HealthResponse {
        status: if store_up { "healthy" } else { "degraded" }.to_string(),
        service: "staffhub-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        revocation_store: if store_up { "up" } else { "down" }.to_string(),
        timestamp: Utc::now(),
    };

    if store_up {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
