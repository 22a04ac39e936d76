//! Builds the configured revocation store and staff directory

use std::sync::Arc;
use tracing::info;

use sh_core::repositories::{InMemoryRevocationRepository, RevocationRepository};
use sh_shared::config::{AppConfig, AuthConfig, RevocationBackend};

use crate::directory::StaticStaffDirectory;
use crate::file::FileRevocationRepository;
use crate::InfrastructureError;

/// Create the revocation repository selected by `auth.revocation.backend`
pub async fn create_revocation_repository(
    config: &AppConfig,
) -> Result<Arc<dyn RevocationRepository>, InfrastructureError> {
    let backend = config.auth.revocation.backend;
    info!(backend = ?backend, "Initializing revocation store");

    match backend {
        RevocationBackend::File => {
            let store = FileRevocationRepository::open(&config.auth.revocation.file_path).await?;
            Ok(Arc::new(store))
        }
        RevocationBackend::Memory => Ok(Arc::new(InMemoryRevocationRepository::new())),
        RevocationBackend::Mysql => mysql_repository(config).await,
        RevocationBackend::Redis => redis_repository(config).await,
    }
}

#[cfg(feature = "mysql")]
async fn mysql_repository(
    config: &AppConfig,
) -> Result<Arc<dyn RevocationRepository>, InfrastructureError> {
    use crate::database::{DatabasePool, MySqlRevocationRepository};

    let pool = DatabasePool::new(&config.database).await?;
    let repository = MySqlRevocationRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .map_err(|e| InfrastructureError::General(e.to_string()))?;

    Ok(Arc::new(repository))
}

#[cfg(not(feature = "mysql"))]
async fn mysql_repository(
    _config: &AppConfig,
) -> Result<Arc<dyn RevocationRepository>, InfrastructureError> {
    Err(InfrastructureError::Config(
        "mysql revocation backend requires the `mysql` feature".to_string(),
    ))
}

#[cfg(feature = "redis-cache")]
async fn redis_repository(
    config: &AppConfig,
) -> Result<Arc<dyn RevocationRepository>, InfrastructureError> {
    use crate::cache::{RedisClient, RedisRevocationRepository};

    let client = RedisClient::new(config.cache.clone()).await?;
    Ok(Arc::new(RedisRevocationRepository::new(client)))
}

#[cfg(not(feature = "redis-cache"))]
async fn redis_repository(
    _config: &AppConfig,
) -> Result<Arc<dyn RevocationRepository>, InfrastructureError> {
    Err(InfrastructureError::Config(
        "redis revocation backend requires the `redis-cache` feature".to_string(),
    ))
}

/// Create the staff directory from configured accounts
pub fn create_staff_directory(
    auth: &AuthConfig,
) -> Result<StaticStaffDirectory, InfrastructureError> {
    let directory = StaticStaffDirectory::from_accounts(&auth.accounts)?;
    info!(accounts = directory.len(), "Staff directory loaded");
    Ok(directory)
}
