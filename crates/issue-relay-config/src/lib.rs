//! Configuration for issue-relay
//!
//! This crate provides:
//! - Required credentials read from the environment (and `.env`)
//! - Scan configuration (organizations, label, window) with TOML overrides
//! - Config file discovery

pub mod config_file;
pub mod credentials;
pub mod error;
pub mod scan_config;

/// GitHub's maximum page size for list endpoints
pub const MAX_PER_PAGE: u8 = 100;

pub use config_file::load_config_file;
pub use credentials::Credentials;
pub use error::ConfigError;
pub use scan_config::ScanConfig;
