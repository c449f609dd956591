//! Test identity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// Unique identity of a single test within a run.
///
/// Built from 128 random bits and rendered as a canonical hyphenated UUID
/// (`8-4-4-4-12`). The same token is sent in the identity header so that
/// audit log entries can be matched back to the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(Uuid);

impl TestId {
    /// Builds an id from 16 random bytes, stamping the UUID v4 version and
    /// variant bits.
    #[must_use]
    pub const fn from_random_bytes(bytes: [u8; 16]) -> Self {
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl From<Uuid> for TestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}
