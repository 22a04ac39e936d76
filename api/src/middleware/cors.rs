//! CORS middleware configuration for cross-origin requests.
//!
//! Development allows any origin. Other environments only allow the
//! origins listed in `CorsConfig.allowed_origins`.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use sh_shared::config::{CorsConfig, Environment};
use tracing::{info, warn};

/// Creates a CORS middleware instance for the given environment
pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    if environment.is_development() && config.allowed_origins.is_empty() {
        create_development_cors(config.max_age)
    } else {
        create_restricted_cors(config)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    info!("Configuring permissive CORS for development");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(max_age)
}

fn create_restricted_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age);

    if config.allowed_origins.is_empty() {
        warn!("No CORS origins configured, cross-origin requests will be refused");
    }

    for origin in config.allowed_origins.iter().map(|s| s.trim()) {
        if !origin.is_empty() {
            info!(origin = %origin, "Adding allowed origin");
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
