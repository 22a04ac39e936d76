//! Token codec: signs and verifies JWTs against the shared secret
//!
//! Pure computation, no I/O. Expiry is evaluated against the injected
//! `Clock` rather than the library's wall clock.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::error;

use crate::clock::Clock;
use crate::domain::entities::token::{Claims, IssuedToken, Role, TokenIdentifier, VerifiedClaims};
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Encodes and decodes signed tokens
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Creates a codec bound to the configured secret
    ///
    /// # Returns
    ///
    /// * `Err(DomainError::Validation)` - The secret is empty
    pub fn new(config: &TokenServiceConfig, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        if config.jwt_secret.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "JWT signing secret must not be empty".to_string(),
            });
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        // Time-based checks run against `clock` in `decode`
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            clock,
        })
    }

    /// Current time according to the codec's clock
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Mints a token for `subject_id` valid for `lifetime` from now
    ///
    /// # Arguments
    ///
    /// * `subject_id` - Identity reference, must not be empty
    /// * `role` - Role claim
    /// * `lifetime` - Positive token lifetime
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - The encoded token and its metadata
    /// * `Err(DomainError)` - Invalid input or signing failure
    pub fn issue(
        &self,
        subject_id: &str,
        role: Role,
        lifetime: Duration,
    ) -> Result<IssuedToken, DomainError> {
        if subject_id.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "subject id must not be empty".to_string(),
            });
        }
        if lifetime <= Duration::zero() {
            return Err(DomainError::Validation {
                message: "token lifetime must be positive".to_string(),
            });
        }

        let issued_at = self.clock.now();
        let claims = Claims::new(
            subject_id,
            role,
            issued_at,
            lifetime,
            self.issuer.as_str(),
            self.audience.as_str(),
        );

        let access_token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| {
                error!(error = %e, "Failed to sign token");
                DomainError::Token(TokenError::TokenGenerationFailed)
            })?;

        let (issued_at, expires_at) = match (claims.issued_at(), claims.expires_at()) {
            (Some(iat), Some(exp)) => (iat, exp),
            _ => return Err(DomainError::Token(TokenError::TokenGenerationFailed)),
        };

        Ok(IssuedToken {
            token_id: TokenIdentifier::from_encoded(&access_token),
            access_token,
            subject_id: claims.sub,
            role,
            issued_at,
            expires_at,
        })
    }

    /// Verifies signature, shape and expiry of an encoded token
    ///
    /// # Returns
    ///
    /// * `Ok(VerifiedClaims)` - The claims and the token identifier
    /// * `Err(TokenError::InvalidSignature)` - Tampered or signed with another secret
    /// * `Err(TokenError::Malformed)` - Not a parseable token for this service
    /// * `Err(TokenError::Expired)` - `exp <= now`
    ///
    /// Surrounding whitespace is ignored, so every caller derives the same
    /// identifier for the same presented token.
    pub fn decode(&self, token: &str) -> Result<VerifiedClaims, TokenError> {
        let token = token.trim();
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;
        let claims = token_data.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        if claims.is_expired_at(self.clock.now()) {
            return Err(TokenError::Expired);
        }

        let (issued_at, expires_at) = match (claims.issued_at(), claims.expires_at()) {
            (Some(iat), Some(exp)) => (iat, exp),
            _ => return Err(TokenError::Malformed),
        };

        Ok(VerifiedClaims {
            subject_id: claims.sub,
            role: claims.role,
            issued_at,
            expires_at,
            token_id: TokenIdentifier::from_encoded(token),
        })
    }
}

/// Maps library failures onto the rejection taxonomy
fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
