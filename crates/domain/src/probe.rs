//! Wire-level view of a single probe.
//!
//! A [`ProbeRequest`] is what the executor hands to the HTTP transport, a
//! [`ProbeResponse`] is the part of the answer that classification needs,
//! and a [`ProbeError`] records why no answer was obtained.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A fully resolved HTTP request for one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    /// HTTP method token, sent as-is.
    pub method: String,
    /// Absolute URL.
    pub url: String,
    /// Headers, set verbatim.
    pub headers: BTreeMap<String, String>,
    /// Request payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Hard limit for connect plus response read, in milliseconds.
    pub timeout_ms: u64,
}

/// Status information of a completed round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Status line, e.g. `"403 Forbidden"`.
    pub status: String,
}

impl ProbeResponse {
    /// Creates a response from a status code and its status line.
    #[must_use]
    pub fn new(status_code: u16, status: impl Into<String>) -> Self {
        Self {
            status_code,
            status: status.into(),
        }
    }
}

/// Why a probe produced no response.
///
/// These are per-test failures; they never abort a run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeError {
    /// The method token cannot be sent.
    #[error("invalid method: {method}")]
    InvalidMethod {
        /// The rejected method.
        method: String,
    },

    /// The URL does not parse.
    #[error("invalid URL {url}: {message}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser message.
        message: String,
    },

    /// A header name or value is not valid on the wire.
    #[error("invalid header {name}: {message}")]
    InvalidHeader {
        /// The rejected header name.
        name: String,
        /// Reason.
        message: String,
    },

    /// The round trip did not finish in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that expired.
        timeout_ms: u64,
    },

    /// The target refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Host name resolution failed.
    #[error("could not resolve {host}: {message}")]
    Dns {
        /// Host that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// TLS handshake or certificate failure.
    #[error("TLS error: {message}")]
    Tls {
        /// Underlying message.
        message: String,
    },

    /// Any other connection-level failure.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        /// Underlying message.
        message: String,
    },

    /// Anything the categories above do not cover.
    #[error("{message}")]
    Other {
        /// Underlying message.
        message: String,
    },
}
