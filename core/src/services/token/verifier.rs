//! Request verification: the two-stage gate in front of protected routes
//!
//! 1. Missing token is rejected immediately.
//! 2. `decode` checks signature, shape and expiry without any I/O.
//! 3. Only a token that passed (2) is looked up in the revocation store.
//!
//! Store errors and timeouts reject the request.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use crate::domain::entities::AuthenticatedIdentity;
use crate::errors::TokenError;
use crate::repositories::RevocationRepository;

use super::codec::TokenCodec;

pub struct TokenVerifier<R: RevocationRepository + ?Sized> {
    codec: Arc<TokenCodec>,
    repository: Arc<R>,
    timeout: Duration,
}

impl<R: RevocationRepository + ?Sized> TokenVerifier<R> {
    pub fn new(codec: Arc<TokenCodec>, repository: Arc<R>, timeout: Duration) -> Self {
        Self {
            codec,
            repository,
            timeout,
        }
    }

    /// Verify a presented bearer token
    ///
    /// # Returns
    /// * `Ok(AuthenticatedIdentity)` - Admitted
    /// * `Err(TokenError)` - Rejected, with the specific reason for logging
    pub async fn verify(&self, token: Option<&str>) -> Result<AuthenticatedIdentity, TokenError> {
        let token = match token {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(TokenError::MissingToken),
        };

        let claims = self.codec.decode(token)?;

        let lookup = self.repository.is_revoked(&claims.token_id);
        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(false)) => {
                debug!(
                    subject_id = %claims.subject_id,
                    token_id = claims.token_id.short(),
                    "Token admitted"
                );
                Ok(AuthenticatedIdentity::from(claims))
            }
            Ok(Ok(true)) => Err(TokenError::Revoked),
            Ok(Err(e)) => {
                error!(token_id = claims.token_id.short(), error = %e, "Revocation lookup failed");
                Err(TokenError::StorageUnavailable)
            }
            Err(_) => {
                error!(
                    token_id = claims.token_id.short(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Revocation lookup timed out"
                );
                Err(TokenError::StorageUnavailable)
            }
        }
    }
}
