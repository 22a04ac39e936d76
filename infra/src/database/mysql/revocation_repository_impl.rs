//! MySQL implementation of the RevocationRepository trait.
//!
//! One row per revoked token in `token_revocations`, keyed by the token
//! identifier. `INSERT IGNORE` makes recording idempotent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use sh_core::domain::entities::{RevocationRecord, TokenIdentifier};
use sh_core::errors::DomainError;
use sh_core::repositories::RevocationRepository;

use crate::database::DatabasePool;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS token_revocations (
        token_id CHAR(64) NOT NULL PRIMARY KEY,
        expires_at DATETIME(6) NOT NULL,
        revoked_at DATETIME(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
        INDEX idx_token_revocations_expires_at (expires_at)
    )
"#;

/// MySQL implementation of RevocationRepository
pub struct MySqlRevocationRepository {
    /// Database connection pool
    pool: DatabasePool,
}

impl MySqlRevocationRepository {
    /// Create a new MySQL revocation repository
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create the `token_revocations` table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(CREATE_TABLE)
            .execute(self.pool.get_pool())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create revocation table: {}", e)))?;

        tracing::info!("Revocation table ready");
        Ok(())
    }

    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RevocationRecord, DomainError> {
        let token_id: String = row
            .try_get("token_id")
            .map_err(|e| DomainError::storage(format!("Failed to get token_id: {}", e)))?;
        let expires_at: DateTime<Utc> = row
            .try_get("expires_at")
            .map_err(|e| DomainError::storage(format!("Failed to get expires_at: {}", e)))?;

        let token_id = TokenIdentifier::from_hex(&token_id).ok_or_else(|| {
            DomainError::storage(format!("Stored token id is not a valid identifier: {}", token_id))
        })?;

        Ok(RevocationRecord::new(token_id, expires_at))
    }
}

#[async_trait]
impl RevocationRepository for MySqlRevocationRepository {
    async fn record_revocation(&self, record: RevocationRecord) -> Result<(), DomainError> {
        let query = r#"
            INSERT IGNORE INTO token_revocations (token_id, expires_at)
            VALUES (?, ?)
        "#;

        sqlx::query(query)
            .bind(record.token_id.as_str())
            .bind(record.expires_at)
            .execute(self.pool.get_pool())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record revocation: {}", e)))?;

        Ok(())
    }

    async fn is_revoked(&self, token_id: &TokenIdentifier) -> Result<bool, DomainError> {
        let query = "SELECT 1 FROM token_revocations WHERE token_id = ? LIMIT 1";

        let row = sqlx::query(query)
            .bind(token_id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check revocation: {}", e)))?;

        Ok(row.is_some())
    }

    async fn find_record(
        &self,
        token_id: &TokenIdentifier,
    ) -> Result<Option<RevocationRecord>, DomainError> {
        let query = r#"
            SELECT token_id, expires_at
            FROM token_revocations
            WHERE token_id = ?
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(token_id.as_str())
            .fetch_optional(self.pool.get_pool())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find revocation: {}", e)))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let query = "DELETE FROM token_revocations WHERE expires_at <= ?";

        let result = sqlx::query(query)
            .bind(now)
            .execute(self.pool.get_pool())
            .await
            .map_err(|e| {
                DomainError::storage(format!("Failed to purge expired revocations: {}", e))
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        self.pool.health_check().await.map_err(DomainError::from)
    }
}
