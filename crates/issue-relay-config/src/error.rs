use thiserror::Error;

/// Errors raised while assembling the startup configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("{name} environment variable is required but not set ({purpose})")]
    MissingVar {
        name: &'static str,
        purpose: &'static str,
    },
}
