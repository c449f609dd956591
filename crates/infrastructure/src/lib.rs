//! WAF Tester Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer: a hyper-backed HTTP client, the
//! system clock and an OS-entropy id source.

pub mod adapters;
pub mod error;

pub use adapters::{HyperHttpClient, OsRngIdSource, SystemClock};
pub use error::InfrastructureError;
