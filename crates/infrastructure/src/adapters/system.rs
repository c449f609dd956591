//! Adapters backed by the operating system: wall-clock time and entropy.

use chrono::{DateTime, Utc};
use rand::TryRngCore;
use rand::rngs::OsRng;
use waftest_application::ports::{Clock, IdSource, IdSourceError};
use waftest_domain::TestId;

/// System clock implementation using the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test id source reading 16 bytes per id from the OS random generator.
///
/// Failure to read is reported, never papered over with a weaker source.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRngIdSource;

impl OsRngIdSource {
    /// Creates a new id source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl IdSource for OsRngIdSource {
    fn next_id(&self) -> Result<TestId, IdSourceError> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| IdSourceError::EntropyUnavailable(e.to_string()))?;
        Ok(TestId::from_random_bytes(bytes))
    }
}
