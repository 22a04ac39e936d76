//! Revocation service: turns a presented token into a durable record

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::domain::entities::{RevocationRecord, TokenIdentifier};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationRepository;

use super::codec::TokenCodec;

/// Result of a successful `revoke` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationOutcome {
    /// A record for the token is now stored
    Revoked {
        token_id: TokenIdentifier,
        expires_at: DateTime<Utc>,
    },
    /// The token was expired or invalid, so it can never be admitted anyway
    NothingToRevoke { reason: TokenError },
}

/// Records revocations through the repository with a bounded write
pub struct RevocationService<R: RevocationRepository + ?Sized> {
    codec: Arc<TokenCodec>,
    repository: Arc<R>,
    timeout: Duration,
}

impl<R: RevocationRepository + ?Sized> RevocationService<R> {
    pub fn new(codec: Arc<TokenCodec>, repository: Arc<R>, timeout: Duration) -> Self {
        Self {
            codec,
            repository,
            timeout,
        }
    }

    /// Revoke a token
    ///
    /// Safe to call repeatedly with the same token.
    ///
    /// # Returns
    /// * `Ok(RevocationOutcome::Revoked)` - The record is durably stored
    /// * `Ok(RevocationOutcome::NothingToRevoke)` - Expired or undecodable token
    /// * `Err(DomainError::RevocationFailed)` - The write failed or timed out;
    ///   the token remains valid
    pub async fn revoke(&self, token: &str) -> Result<RevocationOutcome, DomainError> {
        let claims = match self.codec.decode(token) {
            Ok(claims) => claims,
            Err(reason) => {
                debug!(reason = reason.reason_code(), "Nothing to revoke");
                return Ok(RevocationOutcome::NothingToRevoke { reason });
            }
        };

        let record = RevocationRecord::new(claims.token_id.clone(), claims.expires_at);

        match tokio::time::timeout(self.timeout, self.repository.record_revocation(record)).await {
            Ok(Ok(())) => {
                info!(
                    subject_id = %claims.subject_id,
                    token_id = claims.token_id.short(),
                    "Token revoked"
                );
                Ok(RevocationOutcome::Revoked {
                    token_id: claims.token_id,
                    expires_at: claims.expires_at,
                })
            }
            Ok(Err(e)) => {
                error!(token_id = claims.token_id.short(), error = %e, "Failed to record revocation");
                Err(DomainError::RevocationFailed {
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                error!(
                    token_id = claims.token_id.short(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Revocation write timed out"
                );
                Err(DomainError::RevocationFailed {
                    reason: "revocation store timed out".to_string(),
                })
            }
        }
    }
}
