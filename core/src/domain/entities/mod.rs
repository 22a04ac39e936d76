//! Domain entities representing tokens, revocations and identities.

pub mod identity;
pub mod revocation;
pub mod token;

// Re-export commonly used types
pub use identity::{AuthenticatedIdentity, StaffAccount};
pub use revocation::RevocationRecord;
pub use token::{
    Claims, IssuedToken, Role, TokenIdentifier, VerifiedClaims, DEFAULT_TOKEN_LIFETIME_SECONDS,
    JWT_AUDIENCE, JWT_ISSUER,
};
