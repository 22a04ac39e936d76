//! Revocation repository trait defining the interface for revocation record persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{RevocationRecord, TokenIdentifier};
use crate::errors::DomainError;

/// Repository trait for revocation records
///
/// The repository exclusively owns the record set. Durable implementations
/// must make a recorded revocation visible to every later `is_revoked` call,
/// including calls made by a new process after a restart.
///
/// # Failure semantics
/// - `record_revocation` must return `Err` whenever the record was not
///   durably stored; it must never report success for a dropped write.
/// - A failed `record_revocation` must leave no partial record behind.
#[async_trait]
pub trait RevocationRepository: Send + Sync {
    /// Durably store a revocation record
    ///
    /// Idempotent: recording an identifier that is already present is a
    /// no-op and returns `Ok(())`.
    ///
    /// # Arguments
    /// * `record` - The record to persist
    ///
    /// # Returns
    /// * `Ok(())` - The record is stored
    /// * `Err(DomainError)` - Storage failed, nothing was written
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use sh_core::domain::entities::{RevocationRecord, TokenIdentifier};
    /// # use sh_core::repositories::RevocationRepository;
    /// # async fn example(repo: &impl RevocationRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let token_id = TokenIdentifier::from_encoded("header.payload.signature");
    /// let record = RevocationRecord::new(token_id.clone(), Utc::now() + Duration::hours(1));
    ///
    /// repo.record_revocation(record).await?;
    /// assert!(repo.is_revoked(&token_id).await?);
    /// # Ok(())
    /// # }
    /// ```
    async fn record_revocation(&self, record: RevocationRecord) -> Result<(), DomainError>;

    /// Check whether a token identifier has been revoked
    ///
    /// # Returns
    /// * `Ok(true)` - A record exists
    /// * `Ok(false)` - No record exists
    /// * `Err(DomainError)` - The store could not be read
    async fn is_revoked(&self, token_id: &TokenIdentifier) -> Result<bool, DomainError>;

    /// Fetch the record for an identifier, if any
    async fn find_record(
        &self,
        token_id: &TokenIdentifier,
    ) -> Result<Option<RevocationRecord>, DomainError>;

    /// Delete records whose `expires_at <= now`
    ///
    /// Records that have not yet expired must never be removed. Safe to run
    /// at any time and concurrently with reads and writes.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records removed
    /// * `Err(DomainError)` - Deletion failed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;

    /// Check that the backing store is reachable
    ///
    /// Stores with nothing to reach keep the default.
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
