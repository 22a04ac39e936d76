//! Authentication service module
//!
//! Credential login on top of the staff directory and the token issuer.
//! Logout is a token revocation and lives in the token service.

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;
