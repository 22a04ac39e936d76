pub mod auth;
pub mod cors;

pub use auth::{extract_bearer_token, AuthContext, JwtAuth, RequestVerifier};
pub use cors::create_cors;
