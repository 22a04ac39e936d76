//! Shared configuration and common types for the StaffHub server
//!
//! This crate provides functionality used across all server crates:
//! - Configuration types and layered loading
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AccountConfig, AppConfig, AuthConfig, CacheConfig, ConfigError, CorsConfig,
    DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig, RevocationBackend,
    RevocationConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
