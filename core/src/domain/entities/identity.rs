//! Identities produced by login and by request verification.

use serde::{Deserialize, Serialize};

use super::token::{Role, TokenIdentifier, VerifiedClaims};

/// Verified identity attached to an admitted request
///
/// Downstream handlers consume this instead of re-verifying the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub subject_id: String,
    pub role: Role,
    /// Identifier of the presented token
    #[serde(skip)]
    pub token_id: Option<TokenIdentifier>,
}

impl From<VerifiedClaims> for AuthenticatedIdentity {
    fn from(claims: VerifiedClaims) -> Self {
        Self {
            subject_id: claims.subject_id,
            role: claims.role,
            token_id: Some(claims.token_id),
        }
    }
}

/// A staff member that can log in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffAccount {
    pub subject_id: String,
    pub role: Role,
}
