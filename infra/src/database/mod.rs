//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Revocation repository backed by the `token_revocations` table

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::MySqlRevocationRepository;
