//! Revocation record entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::token::TokenIdentifier;

/// "This exact token must be rejected"
///
/// `expires_at` is copied from the revoked token and only drives garbage
/// collection: once it has passed, the token fails its own expiry check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationRecord {
    /// Identifier of the revoked token
    pub token_id: TokenIdentifier,

    /// Natural expiry of the revoked token
    pub expires_at: DateTime<Utc>,
}

impl RevocationRecord {
    pub fn new(token_id: TokenIdentifier, expires_at: DateTime<Utc>) -> Self {
        Self {
            token_id,
            expires_at,
        }
    }

    /// Whether the record may be purged at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
