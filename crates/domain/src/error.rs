//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The target host is empty, carries a scheme or path, or does not parse.
    #[error("invalid host: {0}")]
    InvalidHost(String),

    /// The URL scheme is neither `http` nor `https`.
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// A run configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An outcome was recorded on a test that has already been classified.
    #[error("test {0} has already been executed")]
    AlreadyExecuted(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
