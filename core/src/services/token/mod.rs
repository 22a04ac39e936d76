//! Token service module
//!
//! - Codec: HS256 encoding and verification against an injected clock
//! - Issuer: mints tokens on login
//! - Verifier: decode first, then the revocation lookup
//! - Revocation: durable, idempotent logout
//! - Cleanup: periodic purge of expired revocation records

mod cleanup;
mod codec;
mod config;
mod issuer;
mod revocation;
mod service;
mod verifier;

#[cfg(test)]
mod tests;

pub use cleanup::{RevocationSweeper, SweepResult, SweeperConfig};
pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use issuer::TokenIssuer;
pub use revocation::{RevocationOutcome, RevocationService};
pub use service::TokenService;
pub use verifier::TokenVerifier;
