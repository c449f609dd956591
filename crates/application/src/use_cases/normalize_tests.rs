//! Normalize tests use case.

use std::sync::Arc;

use waftest_domain::{RawTest, Test};

use crate::ApplicationResult;
use crate::ports::IdSource;

/// Use case turning raw fixture records into executable tests.
///
/// Each record gets a fresh id from the [`IdSource`] and is then normalized
/// by [`Test::normalize`]. A failing id source aborts the whole batch.
pub struct NormalizeTests<S: IdSource> {
    ids: Arc<S>,
}

impl<S: IdSource> NormalizeTests<S> {
    /// Creates a new `NormalizeTests` use case.
    pub const fn new(ids: Arc<S>) -> Self {
        Self { ids }
    }

    /// Normalizes a single record.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::IdentityUnavailable` if no id can be generated.
    pub fn normalize(&self, raw: RawTest) -> ApplicationResult<Test> {
        let id = self.ids.next_id()?;
        Ok(Test::normalize(raw, id))
    }

    /// Normalizes a batch, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::IdentityUnavailable` on the first id
    /// failure; no partial batch is returned.
    pub fn normalize_all(&self, raw_tests: Vec<RawTest>) -> ApplicationResult<Vec<Test>> {
        raw_tests
            .into_iter()
            .map(|raw| self.normalize(raw))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};

    use pretty_assertions::assert_eq;
    use waftest_domain::{IDENTITY_HEADER, SENTINEL_METHOD, TestId};

    use crate::ApplicationError;
    use crate::ports::IdSourceError;

    /// Deterministic id source: a counter spread over the 16 bytes.
    struct CountingIds(AtomicU64);

    impl IdSource for CountingIds {
        fn next_id(&self) -> Result<TestId, IdSourceError> {
            let n = self.0.fetch_add(1, Ordering::Relaxed);
            let mut bytes = [0u8; 16];
            bytes[..8].copy_from_slice(&n.to_be_bytes());
            Ok(TestId::from_random_bytes(bytes))
        }
    }

    /// Id source that fails after `remaining` ids.
    struct ExhaustedIds(AtomicU64);

    impl IdSource for ExhaustedIds {
        fn next_id(&self) -> Result<TestId, IdSourceError> {
            let remaining = self.0.load(Ordering::Relaxed);
            if remaining == 0 {
                return Err(IdSourceError::EntropyUnavailable(
                    "getrandom failed".to_string(),
                ));
            }
            self.0.store(remaining - 1, Ordering::Relaxed);
            Ok(TestId::from_random_bytes([remaining as u8; 16]))
        }
    }

    #[test]
    fn test_normalize_assigns_id_and_header() {
        let use_case = NormalizeTests::new(Arc::new(CountingIds(AtomicU64::new(0))));
        let test = use_case.normalize(RawTest::new("t", "/")).unwrap();

        assert_eq!(test.headers.get(IDENTITY_HEADER), Some(&test.id.to_string()));
        assert_eq!(test.method, SENTINEL_METHOD);
    }

    #[test]
    fn test_normalize_all_keeps_order_and_unique_ids() {
        let use_case = NormalizeTests::new(Arc::new(CountingIds(AtomicU64::new(0))));
        let raw: Vec<_> = (0..100)
            .map(|i| RawTest::new(format!("t{i}"), "/"))
            .collect();

        let tests = use_case.normalize_all(raw).unwrap();

        assert_eq!(tests.len(), 100);
        assert_eq!(tests[0].title, "t0");
        assert_eq!(tests[99].title, "t99");
        let ids: HashSet<_> = tests.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_identity_failure_aborts_batch() {
        let use_case = NormalizeTests::new(Arc::new(ExhaustedIds(AtomicU64::new(2))));
        let raw = vec![
            RawTest::new("a", "/"),
            RawTest::new("b", "/"),
            RawTest::new("c", "/"),
        ];

        let result = use_case.normalize_all(raw);

        assert!(matches!(
            result,
            Err(ApplicationError::IdentityUnavailable(
                IdSourceError::EntropyUnavailable(_)
            ))
        ));
    }
}
