//! # StaffHub API
//!
//! HTTP layer for the StaffHub backend: the application factory, the
//! bearer token middleware, auth routes, error mapping and the client-side
//! session boundary.

pub mod app;
pub mod client;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use client::{ClientError, HttpSessionTransport, SessionClient, SessionTransport};
pub use handlers::ApiError;
pub use middleware::{AuthContext, JwtAuth};
pub use routes::AppState;
