//! Staff directory implementations

pub mod static_directory;

pub use static_directory::StaticStaffDirectory;
