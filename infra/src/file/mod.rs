//! File-backed revocation store for single-node deployments

pub mod revocation_file_store;

pub use revocation_file_store::FileRevocationRepository;
