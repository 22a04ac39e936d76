//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: i64 = 3600;

/// JWT issuer
pub const JWT_ISSUER: &str = "staffhub";

/// JWT audience
pub const JWT_AUDIENCE: &str = "staffhub-api";

/// Role claim carried by every token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (identity reference)
    pub sub: String,

    /// Role claim
    pub role: Role,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, random per token so that two tokens never share an encoding
    pub jti: String,
}

impl Claims {
    /// Creates claims for a token issued at `issued_at`
    pub fn new(
        subject_id: impl Into<String>,
        role: Role,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        let expiry = issued_at + lifetime;

        Self {
            sub: subject_id.into(),
            role,
            iat: issued_at.timestamp(),
            exp: expiry.timestamp(),
            nbf: issued_at.timestamp(),
            iss: issuer.into(),
            aud: audience.into(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks whether the claims have expired at `now`
    ///
    /// A token is expired once `exp <= now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    /// Expiry as a timestamp, `None` if out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Issue time as a timestamp, `None` if out of range
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }
}

/// Canonical identifier of an encoded token
///
/// Lowercase hex SHA-256 of the exact encoded token string. Any change to the
/// encoding changes the identifier, and an encoding can only be produced by
/// the holder of the signing secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenIdentifier(String);

impl TokenIdentifier {
    /// Derives the identifier from an encoded token
    pub fn from_encoded(token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Restores an identifier read back from storage
    ///
    /// Returns `None` unless the value is 64 lowercase hex characters.
    pub fn from_hex(value: &str) -> Option<Self> {
        let valid = value.len() == 64
            && value
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for TokenIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A freshly minted token handed to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Encoded bearer token
    pub access_token: String,

    /// Identifier of `access_token`
    pub token_id: TokenIdentifier,

    /// Subject the token was issued for
    pub subject_id: String,

    /// Role claim
    pub role: Role,

    /// Issue time
    pub issued_at: DateTime<Utc>,

    /// Natural expiry
    pub expires_at: DateTime<Utc>,
}

impl IssuedToken {
    /// Lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }
}

/// Claims of a token whose signature and expiry have been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    pub subject_id: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub token_id: TokenIdentifier,
}
