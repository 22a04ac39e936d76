//! In-memory implementation of RevocationRepository
//!
//! Records live only as long as the process. Suitable for tests and
//! single-process development; durable backends live in the infra crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{RevocationRecord, TokenIdentifier};
use crate::errors::DomainError;

use super::r#trait::RevocationRepository;

/// Process-local revocation repository
#[derive(Clone, Default)]
pub struct InMemoryRevocationRepository {
    records: Arc<RwLock<HashMap<TokenIdentifier, RevocationRecord>>>,
}

impl InMemoryRevocationRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no records are held
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationRepository for InMemoryRevocationRepository {
    async fn record_revocation(&self, record: RevocationRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.entry(record.token_id.clone()).or_insert(record);
        Ok(())
    }

    async fn is_revoked(&self, token_id: &TokenIdentifier) -> Result<bool, DomainError> {
        Ok(self.records.read().await.contains_key(token_id))
    }

    async fn find_record(
        &self,
        token_id: &TokenIdentifier,
    ) -> Result<Option<RevocationRecord>, DomainError> {
        Ok(self.records.read().await.get(token_id).cloned())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let initial_count = records.len();

        records.retain(|_, record| !record.is_expired_at(now));

        Ok(initial_count - records.len())
    }
}
