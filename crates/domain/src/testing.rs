//! WAF tests and their verdicts.
//!
//! A [`Test`] is created from a [`RawTest`] by [`Test::normalize`], executed
//! exactly once, and then handed to reporting. Its outcome moves through
//! `Unexecuted -> Completed | Errored -> Classified` and never leaves the
//! classified state.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::fixture::RawTest;
use crate::id::TestId;
use crate::probe::{ProbeError, ProbeResponse};

/// Header carrying the test id on every probe.
pub const IDENTITY_HEADER: &str = "waf-tester-id";

/// Description used when a fixture does not provide one.
pub const DEFAULT_DESCRIPTION: &str = "No test description";

/// Status code a WAF is expected to answer with when none is given.
pub const DEFAULT_EXPECTED_STATUS: u16 = 403;

/// Method assigned to tests that do not name one. No server implements it.
pub const SENTINEL_METHOD: &str = "XXX";

/// Verdict of a single test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestStatus {
    /// The response status was one of the expected codes.
    #[serde(rename = "OK")]
    Ok,
    /// No response was obtained.
    #[serde(rename = "ERR")]
    Err,
    /// A response arrived but its status was not expected.
    #[serde(rename = "FAIL")]
    Fail,
}

impl TestStatus {
    /// Classifies an observed status code.
    ///
    /// Precedence: membership in `expected` wins, then a zero status code
    /// (no response) is an error, anything else is a failure.
    #[must_use]
    pub fn classify(status_code: u16, expected: &BTreeSet<u16>) -> Self {
        if expected.contains(&status_code) {
            Self::Ok
        } else if status_code == 0 {
            Self::Err
        } else {
            Self::Fail
        }
    }

    /// Returns the verdict as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Err => "ERR",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One probe definition together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    /// Unique identity, assigned at normalization.
    pub id: TestId,
    /// Test title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Label of the fixture file the test came from.
    pub source_file: String,
    /// HTTP method token.
    pub method: String,
    /// Request path (and query).
    pub path: String,
    /// Request headers, including [`IDENTITY_HEADER`].
    pub headers: BTreeMap<String, String>,
    /// Body fragments.
    pub data: Vec<String>,
    /// Acceptable status codes, never empty.
    pub expected_status_codes: BTreeSet<u16>,

    /// Resolved URL, set on execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Response status code, 0 if no response was obtained.
    #[serde(default)]
    pub status_code: u16,
    /// Response status line, empty if no response was obtained.
    #[serde(default)]
    pub status: String,
    /// Transport failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<ProbeError>,
    /// Verdict, set once after execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_status: Option<TestStatus>,
}

impl Test {
    /// Turns a raw record into an executable test.
    ///
    /// Empty description, method and expected codes are filled with
    /// [`DEFAULT_DESCRIPTION`], [`SENTINEL_METHOD`] and
    /// [`DEFAULT_EXPECTED_STATUS`]. The identity header is injected, replacing
    /// any fixture header of the same name regardless of case.
    #[must_use]
    pub fn normalize(raw: RawTest, id: TestId) -> Self {
        let RawTest {
            title,
            description,
            source_file,
            method,
            path,
            mut headers,
            data,
            expected_status_codes,
        } = raw;

        headers.retain(|name, _| !name.eq_ignore_ascii_case(IDENTITY_HEADER));
        headers.insert(IDENTITY_HEADER.to_string(), id.to_string());

        let description = description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        let method = method
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| SENTINEL_METHOD.to_string());
        let mut expected_status_codes: BTreeSet<u16> =
            expected_status_codes.into_iter().collect();
        if expected_status_codes.is_empty() {
            expected_status_codes.insert(DEFAULT_EXPECTED_STATUS);
        }

        Self {
            id,
            title,
            description,
            source_file,
            method,
            path,
            headers,
            data,
            expected_status_codes,
            url: None,
            status_code: 0,
            status: String::new(),
            err: None,
            test_status: None,
        }
    }

    /// Returns the request body: all data fragments concatenated in order.
    #[must_use]
    pub fn body(&self) -> String {
        self.data.concat()
    }

    /// Returns true once an outcome has been recorded.
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        self.test_status.is_some()
    }

    /// Records the outcome of the single execution and classifies it.
    ///
    /// On success the status code and line are stored; on failure the error
    /// is stored and the status code stays 0.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AlreadyExecuted`] if an outcome was recorded
    /// before; the test is left untouched.
    ///
    /// An empty expected set is filled with [`DEFAULT_EXPECTED_STATUS`] first,
    /// so classification never runs against no codes at all.
    pub fn record(
        &mut self,
        url: impl Into<String>,
        outcome: Result<ProbeResponse, ProbeError>,
    ) -> DomainResult<TestStatus> {
        if self.is_executed() {
            return Err(DomainError::AlreadyExecuted(self.id.to_string()));
        }

        self.url = Some(url.into());
        match outcome {
            Ok(response) => {
                self.status_code = response.status_code;
                self.status = response.status;
            }
            Err(err) => self.err = Some(err),
        }

        // Tests built or deserialized outside `normalize` may lack codes.
        if self.expected_status_codes.is_empty() {
            self.expected_status_codes.insert(DEFAULT_EXPECTED_STATUS);
        }
        let verdict = TestStatus::classify(self.status_code, &self.expected_status_codes);
        self.test_status = Some(verdict);
        Ok(verdict)
    }
}
