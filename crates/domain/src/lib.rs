//! WAF Tester Domain - Core business types
//!
//! This crate defines the domain model of the WAF regression tester:
//! raw fixture records, normalized tests with their verdicts, probe
//! requests and errors, targets and run configuration.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod error;
pub mod fixture;
pub mod id;
pub mod probe;
pub mod report;
pub mod target;
pub mod testing;

pub use config::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, RunConfig};
pub use error::{DomainError, DomainResult};
pub use fixture::RawTest;
pub use id::TestId;
pub use probe::{ProbeError, ProbeRequest, ProbeResponse};
pub use report::{RunReport, RunSummary};
pub use target::{Scheme, Target, clean_path};
pub use testing::{
    DEFAULT_DESCRIPTION, DEFAULT_EXPECTED_STATUS, IDENTITY_HEADER, SENTINEL_METHOD, Test,
    TestStatus,
};
