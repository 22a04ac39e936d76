//! Configuration module with sub-modules per concern
//!
//! - `auth` - JWT signing, revocation store and staff accounts
//! - `cache` - Redis connection
//! - `database` - MySQL connection pool
//! - `environment` - Environment detection and logging
//! - `server` - HTTP server and CORS
//!
//! Values are layered: built-in defaults, then `config.<environment>.toml`
//! if present, then `STAFFHUB__SECTION__KEY` environment variables, then the
//! conventional `JWT_SECRET`, `DATABASE_URL` and `REDIS_URL` variables.

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::{AccountConfig, AuthConfig, JwtConfig, RevocationBackend, RevocationConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub cache: CacheConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from file and environment, then validate it
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let logging = LoggingConfig::for_environment(environment);

        let settings = ::config::Config::builder()
            .set_default("environment", environment.to_string())?
            .set_default("logging.level", logging.level)?
            .set_default("logging.format", format!("{:?}", logging.format).to_lowercase())?
            .add_source(::config::File::with_name(environment.config_file()).required(false))
            .add_source(
                ::config::Environment::with_prefix("STAFFHUB")
                    .separator("__"),
            )
            .set_override_option("auth.jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.url", std::env::var("REDIS_URL").ok())?
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that cannot be expressed through defaults
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.auth.jwt.has_secret() {
            return Err(ConfigError::MissingSecret);
        }

        if self.auth.jwt.token_lifetime_seconds <= 0 {
            return Err(ConfigError::Invalid {
                field: "auth.jwt.token_lifetime_seconds".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        if self.auth.revocation.storage_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "auth.revocation.storage_timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.environment.is_production() && !self.auth.revocation.backend.is_durable() {
            return Err(ConfigError::Invalid {
                field: "auth.revocation.backend".to_string(),
                reason: "memory backend does not survive restarts".to_string(),
            });
        }

        Ok(())
    }
}
