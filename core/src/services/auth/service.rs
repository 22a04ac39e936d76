//! Main authentication service implementation

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::IssuedToken;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{RevocationRepository, StaffDirectory};
use crate::services::token::{RevocationOutcome, TokenService};

/// Authentication service for the login and logout flows
pub struct AuthService<D, R>
where
    D: StaffDirectory + ?Sized,
    R: RevocationRepository + ?Sized,
{
    /// Directory used to check credentials
    directory: Arc<D>,
    /// Token service for issuing and revoking tokens
    token_service: Arc<TokenService<R>>,
}

impl<D, R> AuthService<D, R>
where
    D: StaffDirectory + ?Sized,
    R: RevocationRepository + ?Sized + 'static,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `directory` - Staff directory for credential checks
    /// * `token_service` - Service for JWT issuance and revocation
    pub fn new(directory: Arc<D>, token_service: Arc<TokenService<R>>) -> Self {
        Self {
            directory,
            token_service,
        }
    }

    /// Log in with a username and password
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - Credentials were valid
    /// * `Err(DomainError::Validation)` - Empty username or password
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Unknown user
    ///   or wrong password
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, DomainError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::Validation {
                message: "username and password are required".to_string(),
            });
        }

        let account = match self.directory.authenticate(username, password).await? {
            Some(account) => account,
            None => {
                warn!(username = %username, "Login rejected: invalid credentials");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let issued = self.token_service.login(&account.subject_id, account.role)?;
        info!(username = %username, subject_id = %account.subject_id, "Login succeeded");

        Ok(issued)
    }

    /// Invalidate the session carried by `token`
    pub async fn logout(&self, token: &str) -> Result<RevocationOutcome, DomainError> {
        self.token_service.revoke(token).await
    }

    pub fn token_service(&self) -> Arc<TokenService<R>> {
        self.token_service.clone()
    }
}
