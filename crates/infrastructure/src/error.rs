//! Infrastructure error types

use thiserror::Error;

/// Errors raised while setting up adapters.
///
/// These abort a run before any test is executed; they are never recorded
/// on a single test.
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// The TLS configuration for the HTTP client could not be built.
    #[error("failed to configure TLS: {0}")]
    Tls(String),
}
