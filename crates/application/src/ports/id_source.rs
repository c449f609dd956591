//! Test identity port

use thiserror::Error;
use waftest_domain::TestId;

/// The random source behind test identities failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdSourceError {
    /// The entropy source could not deliver random bytes.
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}

/// Port for generating test identities.
///
/// Every call must return a fresh id drawn from a cryptographically sound
/// random source; ids are never reused within a run.
pub trait IdSource: Send + Sync {
    /// Returns a new id.
    ///
    /// # Errors
    ///
    /// Returns [`IdSourceError`] if no randomness is available.
    fn next_id(&self) -> Result<TestId, IdSourceError>;
}
