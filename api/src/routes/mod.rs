pub mod auth;
pub mod health;
pub mod session;

pub use auth::AppState;
