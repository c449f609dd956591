//! HTTP Client port

use std::future::Future;

use waftest_domain::{ProbeError, ProbeRequest, ProbeResponse};

/// Port for issuing probes.
///
/// Implementations perform exactly one round trip per call, honour
/// `request.timeout_ms` for the whole exchange and never retry. They must be
/// safe to share between concurrently running probes.
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the response status.
    ///
    /// # Errors
    ///
    /// Returns a [`ProbeError`] if the request cannot be built or no
    /// response arrives (connection failure, timeout, TLS failure).
    fn execute(
        &self,
        request: &ProbeRequest,
    ) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send;
}
