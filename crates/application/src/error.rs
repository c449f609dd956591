//! Application error types
//!
//! Only run-aborting failures surface here. Per-test transport failures are
//! recorded on the test itself as a `ProbeError`.

use thiserror::Error;
use waftest_domain::DomainError;

use crate::ports::IdSourceError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// No test identity could be generated; the run cannot continue.
    #[error("cannot generate test identity: {0}")]
    IdentityUnavailable(#[from] IdSourceError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
