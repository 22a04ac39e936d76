//! Authentication and token revocation configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// JWT signing configuration
///
/// The secret must be identical across restarts, otherwise every token
/// issued by a previous process becomes unverifiable.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// HMAC secret used to sign and verify tokens
    pub secret: String,

    /// Default token lifetime in seconds
    pub token_lifetime_seconds: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_lifetime_seconds: 3600, // 1 hour
            issuer: String::from("staffhub"),
            audience: String::from("staffhub-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set token lifetime in minutes
    pub fn with_lifetime_minutes(mut self, minutes: i64) -> Self {
        self.token_lifetime_seconds = minutes * 60;
        self
    }

    /// Check whether a signing secret was supplied
    pub fn has_secret(&self) -> bool {
        !self.secret.trim().is_empty()
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("token_lifetime_seconds", &self.token_lifetime_seconds)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// Storage backend holding revocation records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationBackend {
    /// JSON snapshot file on local disk
    File,
    /// MySQL table
    Mysql,
    /// Redis keys with native expiry
    Redis,
    /// Process memory only, lost on restart
    Memory,
}

impl RevocationBackend {
    /// Whether records survive a process restart
    pub fn is_durable(&self) -> bool {
        !matches!(self, RevocationBackend::Memory)
    }
}

impl std::str::FromStr for RevocationBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(RevocationBackend::File),
            "mysql" => Ok(RevocationBackend::Mysql),
            "redis" => Ok(RevocationBackend::Redis),
            "memory" => Ok(RevocationBackend::Memory),
            _ => Err(format!("Invalid revocation backend: {}", s)),
        }
    }
}

/// Revocation store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RevocationConfig {
    /// Storage backend
    pub backend: RevocationBackend,

    /// Snapshot path for the file backend
    pub file_path: String,

    /// Upper bound on a single store read or write, in milliseconds
    pub storage_timeout_ms: u64,

    /// Run the periodic purge of expired records
    pub sweep_enabled: bool,

    /// Purge interval in seconds
    pub sweep_interval_seconds: u64,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            backend: RevocationBackend::File,
            file_path: String::from("data/revocations.json"),
            storage_timeout_ms: 2000,
            sweep_enabled: true,
            sweep_interval_seconds: 3600, // Run every hour
        }
    }
}

/// A staff login seeded from configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    /// Login name
    pub username: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// Identity reference placed in the token subject
    pub subject_id: String,

    /// Role claim ("admin", "manager" or "staff")
    pub role: String,
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Revocation store configuration
    pub revocation: RevocationConfig,

    /// Static staff accounts
    pub accounts: Vec<AccountConfig>,
}
