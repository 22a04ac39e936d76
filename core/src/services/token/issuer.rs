//! Token issuer used by the login path

use chrono::Duration;
use std::sync::Arc;
use tracing::info;

use crate::domain::entities::token::{IssuedToken, Role};
use crate::errors::DomainError;

use super::codec::TokenCodec;

/// Mints tokens with the configured lifetime
///
/// Issuing writes nothing to storage: an unrevoked token is valid on its
/// signature and expiry alone.
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, lifetime: Duration) -> Self {
        Self { codec, lifetime }
    }

    /// Issue a token for `subject_id` expiring `lifetime` from now
    pub fn login(&self, subject_id: &str, role: Role) -> Result<IssuedToken, DomainError> {
        let issued = self.codec.issue(subject_id, role, self.lifetime)?;

        info!(
            subject_id = %issued.subject_id,
            role = %issued.role,
            token_id = issued.token_id.short(),
            expires_at = %issued.expires_at,
            "Issued access token"
        );

        Ok(issued)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}
