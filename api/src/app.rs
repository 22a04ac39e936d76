//! Application factory
//!
//! Builds the actix-web `App` from prepared state so the binary and the
//! integration tests run the same routing and middleware stack.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use sh_shared::{error_codes, CorsConfig, Environment, ErrorResponse};
use tracing_actix_web::TracingLogger;

use crate::handlers::error::ApiError;
use crate::middleware::{auth::JwtAuth, auth::RequestVerifier, cors::create_cors};
use crate::routes::{
    auth::{login::login, logout::logout},
    health::health_check,
    session::current_session,
    AppState,
};

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    cors: &CorsConfig,
    environment: Environment,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let verifier: Arc<dyn RequestVerifier> = state.token_service.clone();
    let json_config = web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

    App::new()
        .app_data(state)
        .app_data(json_config)
        .wrap(create_cors(cors, environment))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(login))
                        .route("/logout", web::post().to(logout)),
                )
                .service(
                    web::scope("/session")
                        .wrap(JwtAuth::new(verifier))
                        .route("", web::get().to(current_session)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
