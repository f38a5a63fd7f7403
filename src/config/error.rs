//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Corpus directory must not be empty")]
    EmptyCorpusDir,

    #[error("Data directory must not be empty")]
    EmptyDataDir,

    #[error("Invalid source timeout (must be 1-300 seconds)")]
    InvalidSourceTimeout,
}
