//! # Infrastructure Layer
//!
//! Concrete implementations of the repository traits defined in `sh_core`:
//!
//! - **Database**: MySQL revocation store using SQLx
//! - **Cache**: Redis revocation store with native key expiry
//! - **File**: single-node JSON snapshot store with atomic replacement
//! - **Directory**: bcrypt-backed staff directory seeded from configuration
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL backend (default)
//! - `redis-cache`: Enable the Redis backend (default)

use sh_core::errors::DomainError;

/// Cache module - Redis client and revocation store
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Database module - MySQL pool and revocation store
#[cfg(feature = "mysql")]
pub mod database;

pub mod directory;
pub mod factory;
pub mod file;

pub use directory::StaticStaffDirectory;
pub use factory::{create_revocation_repository, create_staff_directory};
pub use file::FileRevocationRepository;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot encoding error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Password hashing error
    #[error("Password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// The file store is already open in another process or handle
    #[error("Revocation store {0} is in use by another process")]
    StoreLocked(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Storage {
            message: error.to_string(),
        }
    }
}
