//! WAF Tester Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP transport, identity source, clock)
//! - Use case orchestration (normalize, execute, run a batch)
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{Clock, HttpClient, IdSource, IdSourceError};
pub use use_cases::{ExecuteTest, NormalizeTests, RunTests};
