//! Configuration for the token service

use chrono::Duration;
use sh_shared::config::AuthConfig;
use std::fmt;

use crate::domain::entities::token::{DEFAULT_TOKEN_LIFETIME_SECONDS, JWT_AUDIENCE, JWT_ISSUER};

/// Configuration for the token service
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HMAC signing secret
    pub jwt_secret: String,
    /// Lifetime of tokens minted at login
    pub token_lifetime: Duration,
    /// JWT issuer claim
    pub issuer: String,
    /// JWT audience claim
    pub audience: String,
    /// Upper bound on a single revocation store read or write
    pub storage_timeout: std::time::Duration,
}

impl TokenServiceConfig {
    /// Create a configuration with the given secret and default settings
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECONDS),
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
            storage_timeout: std::time::Duration::from_secs(2),
        }
    }

    /// Derive the service configuration from the application auth section
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        Self {
            jwt_secret: auth.jwt.secret.clone(),
            token_lifetime: Duration::seconds(auth.jwt.token_lifetime_seconds),
            issuer: auth.jwt.issuer.clone(),
            audience: auth.jwt.audience.clone(),
            storage_timeout: std::time::Duration::from_millis(auth.revocation.storage_timeout_ms),
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    pub fn with_storage_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.storage_timeout = timeout;
        self
    }
}

impl fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_lifetime", &self.token_lifetime)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("storage_timeout", &self.storage_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sh_shared::config::JwtConfig;

    #[test]
    fn test_from_auth_config() {
        let mut auth = AuthConfig {
            jwt: JwtConfig::new("configured-secret").with_lifetime_minutes(30),
            ..Default::default()
        };
        auth.revocation.storage_timeout_ms = 750;

        let config = TokenServiceConfig::from_auth_config(&auth);

        assert_eq!(config.jwt_secret, "configured-secret");
        assert_eq!(config.token_lifetime, Duration::minutes(30));
        assert_eq!(config.issuer, "staffhub");
        assert_eq!(config.storage_timeout, std::time::Duration::from_millis(750));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = TokenServiceConfig::new("do-not-print");
        assert!(!format!("{:?}", config).contains("do-not-print"));
    }
}
