//! Redis implementation of the RevocationRepository trait.
//!
//! Each revoked token is a key `<prefix>revoked:<token_id>` whose value is the
//! token's expiry as a unix timestamp. The key expires at that same instant,
//! so Redis drops records on its own and `purge_expired` has nothing to do.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use redis::AsyncCommands;

use sh_core::domain::entities::{RevocationRecord, TokenIdentifier};
use sh_core::errors::DomainError;
use sh_core::repositories::RevocationRepository;

use super::redis_client::RedisClient;

/// Redis-backed revocation store
pub struct RedisRevocationRepository {
    client: RedisClient,
}

impl RedisRevocationRepository {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(&self, token_id: &TokenIdentifier) -> String {
        self.client.key(&format!("revoked:{}", token_id))
    }
}

#[async_trait]
impl RevocationRepository for RedisRevocationRepository {
    async fn record_revocation(&self, record: RevocationRecord) -> Result<(), DomainError> {
        let key = self.key(&record.token_id);
        let expires_at = record.expires_at.timestamp();

        // SET NX keeps the first record; EXPIREAT is idempotent for the same value
        self.client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move {
                    redis::pipe()
                        .atomic()
                        .cmd("SET")
                        .arg(&key)
                        .arg(expires_at)
                        .arg("NX")
                        .ignore()
                        .cmd("EXPIREAT")
                        .arg(&key)
                        .arg(expires_at)
                        .ignore()
                        .query_async::<_, ()>(&mut conn)
                        .await
                })
            })
            .await
            .map_err(|e| DomainError::storage(format!("Failed to record revocation: {}", e)))
    }

    async fn is_revoked(&self, token_id: &TokenIdentifier) -> Result<bool, DomainError> {
        let key = self.key(token_id);

        self.client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.exists::<_, bool>(key).await })
            })
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check revocation: {}", e)))
    }

    async fn find_record(
        &self,
        token_id: &TokenIdentifier,
    ) -> Result<Option<RevocationRecord>, DomainError> {
        let key = self.key(token_id);

        let stored: Option<i64> = self
            .client
            .execute_with_retry(|mut conn| {
                let key = key.clone();
                Box::pin(async move { conn.get::<_, Option<i64>>(key).await })
            })
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find revocation: {}", e)))?;

        stored
            .map(|timestamp| {
                let expires_at: DateTime<Utc> =
                    Utc.timestamp_opt(timestamp, 0).single().ok_or_else(|| {
                        DomainError::storage(format!("Invalid stored expiry: {}", timestamp))
                    })?;
                Ok(RevocationRecord::new(token_id.clone(), expires_at))
            })
            .transpose()
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, DomainError> {
        Ok(0)
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        self.client.health_check().await.map_err(DomainError::from)
    }
}
