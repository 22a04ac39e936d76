//! Token service facade wiring codec, issuer, verifier, revocation and sweeper
//! around one repository and one clock.

use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::clock::Clock;
use crate::domain::entities::{AuthenticatedIdentity, IssuedToken, Role};
use crate::errors::{DomainError, TokenError};
use crate::repositories::RevocationRepository;

use super::cleanup::{RevocationSweeper, SweeperConfig};
use super::codec::TokenCodec;
use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::revocation::{RevocationOutcome, RevocationService};
use super::verifier::TokenVerifier;

/// Token service for issuing, verifying and revoking tokens
pub struct TokenService<R: RevocationRepository + ?Sized> {
    codec: Arc<TokenCodec>,
    issuer: TokenIssuer,
    verifier: TokenVerifier<R>,
    revocation: RevocationService<R>,
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    storage_timeout: Duration,
}

impl<R: RevocationRepository + ?Sized + 'static> TokenService<R> {
    /// Create a new token service
    ///
    /// # Returns
    /// * `Err(DomainError::Validation)` - Empty secret or non-positive lifetime
    pub fn new(
        repository: Arc<R>,
        config: TokenServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        if config.token_lifetime <= chrono::Duration::zero() {
            return Err(DomainError::Validation {
                message: "token lifetime must be positive".to_string(),
            });
        }

        let codec = Arc::new(TokenCodec::new(&config, clock.clone())?);

        Ok(Self {
            issuer: TokenIssuer::new(codec.clone(), config.token_lifetime),
            verifier: TokenVerifier::new(
                codec.clone(),
                repository.clone(),
                config.storage_timeout,
            ),
            revocation: RevocationService::new(
                codec.clone(),
                repository.clone(),
                config.storage_timeout,
            ),
            codec,
            repository,
            clock,
            storage_timeout: config.storage_timeout,
        })
    }

    /// Issue a token with the configured lifetime
    pub fn login(&self, subject_id: &str, role: Role) -> Result<IssuedToken, DomainError> {
        self.issuer.login(subject_id, role)
    }

    /// Run the verification gate for a presented token
    pub async fn verify(&self, token: Option<&str>) -> Result<AuthenticatedIdentity, TokenError> {
        self.verifier.verify(token).await
    }

    /// Revoke a presented token
    pub async fn revoke(&self, token: &str) -> Result<RevocationOutcome, DomainError> {
        self.revocation.revoke(token).await
    }

    /// Check the revocation store, bounded by the storage timeout
    pub async fn check_storage(&self) -> Result<(), DomainError> {
        let result = match tokio::time::timeout(self.storage_timeout, self.repository.health_check())
            .await
        {
            Ok(result) => result,
            Err(_) => Err(DomainError::storage("revocation store health check timed out")),
        };

        if let Err(e) = &result {
            warn!(error = %e, "Revocation store health check failed");
        }
        result
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn repository(&self) -> Arc<R> {
        self.repository.clone()
    }

    /// Build a sweeper over the same repository and clock
    pub fn sweeper(&self, config: SweeperConfig) -> RevocationSweeper<R> {
        RevocationSweeper::new(self.repository.clone(), self.clock.clone(), config)
    }
}
