//! Repository interfaces owned by the domain layer.

pub mod directory;
pub mod revocation;

pub use directory::StaffDirectory;
pub use revocation::{InMemoryRevocationRepository, RevocationRepository};
