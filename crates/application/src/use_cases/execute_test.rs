//! Execute test use case
//!
//! Turns a normalized test into one live probe against a target and records
//! the verdict on the test.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use waftest_domain::{
    DEFAULT_TIMEOUT_SECS, DomainError, ProbeError, ProbeRequest, SENTINEL_METHOD, Target, Test,
    TestStatus,
};

use crate::ApplicationResult;
use crate::ports::HttpClient;

/// Use case for executing a single test.
///
/// Each call issues at most one request; transport failures are recorded on
/// the test and classified as `ERR`, never retried.
///
/// # Example
///
/// ```ignore
/// let client = Arc::new(HyperHttpClient::new()?);
/// let use_case = ExecuteTest::new(client);
///
/// let target = Target::new(Scheme::Http, "waf.example.com")?;
/// let verdict = use_case.execute(&mut test, &target).await?;
/// ```
pub struct ExecuteTest<C: HttpClient> {
    client: Arc<C>,
    timeout: Duration,
}

impl<C: HttpClient> ExecuteTest<C> {
    /// Creates a new `ExecuteTest` use case with the default 10 second timeout.
    pub const fn new(client: Arc<C>) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the per-probe timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the wire request for `test` against `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidMethod`] for an empty method or the
    /// sentinel method, which is never sent.
    pub fn build_request(&self, test: &Test, target: &Target) -> Result<ProbeRequest, ProbeError> {
        if test.method.is_empty() || test.method == SENTINEL_METHOD {
            return Err(ProbeError::InvalidMethod {
                method: test.method.clone(),
            });
        }

        let body = test.body();
        let body = (!body.is_empty() && method_permits_body(&test.method)).then_some(body);

        Ok(ProbeRequest {
            method: test.method.clone(),
            url: target.url_for(&test.path),
            headers: test.headers.clone(),
            body,
            timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }

    /// Executes the test and records URL, status and verdict on it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the test was already executed; it is then
    /// left untouched and no request is sent.
    pub async fn execute(&self, test: &mut Test, target: &Target) -> ApplicationResult<TestStatus> {
        if test.is_executed() {
            return Err(DomainError::AlreadyExecuted(test.id.to_string()).into());
        }

        let url = target.url_for(&test.path);
        let outcome = match self.build_request(test, target) {
            Ok(request) => self.client.execute(&request).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            warn!(id = %test.id, title = %test.title, %url, error = %e, "probe failed");
        }

        let verdict = test.record(url, outcome)?;
        debug!(
            id = %test.id,
            method = %test.method,
            url = test.url.as_deref().unwrap_or_default(),
            status_code = test.status_code,
            verdict = %verdict,
            "probe classified"
        );
        Ok(verdict)
    }
}

/// Returns whether a request with this method may carry content.
/// `TRACE` is the only method that must not.
fn method_permits_body(method: &str) -> bool {
    !method.eq_ignore_ascii_case("TRACE")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use waftest_domain::{IDENTITY_HEADER, ProbeResponse, RawTest, Scheme, TestId};

    use crate::ApplicationError;

    /// Mock HTTP client for testing.
    struct MockHttpClient {
        response: Result<ProbeResponse, ProbeError>,
        sent: Mutex<Vec<ProbeRequest>>,
    }

    impl MockHttpClient {
        fn status(code: u16, line: &str) -> Self {
            Self {
                response: Ok(ProbeResponse::new(code, line)),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn error(err: ProbeError) -> Self {
            Self {
                response: Err(err),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<ProbeRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl HttpClient for MockHttpClient {
        fn execute(
            &self,
            request: &ProbeRequest,
        ) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send {
            self.sent.lock().unwrap().push(request.clone());
            let result = self.response.clone();
            async move { result }
        }
    }

    fn target() -> Target {
        Target::new(Scheme::Http, "waf.example.com").unwrap()
    }

    fn normalized(raw: RawTest) -> Test {
        Test::normalize(raw, TestId::from_random_bytes([42; 16]))
    }

    #[tokio::test]
    async fn test_blocked_request_is_ok() {
        let client = Arc::new(MockHttpClient::status(403, "403 Forbidden"));
        let use_case = ExecuteTest::new(Arc::clone(&client));
        let mut test = normalized(
            RawTest::new("admin", "/admin")
                .with_method("GET")
                .with_expected_status_codes([403]),
        );

        let verdict = use_case.execute(&mut test, &target()).await.unwrap();

        assert_eq!(verdict, TestStatus::Ok);
        assert_eq!(test.status_code, 403);
        assert_eq!(test.status, "403 Forbidden");
        assert_eq!(test.url.as_deref(), Some("http://waf.example.com/admin"));
        assert_eq!(client.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_status_is_fail() {
        let client = Arc::new(MockHttpClient::status(200, "200 OK"));
        let use_case = ExecuteTest::new(client);
        let mut test = normalized(RawTest::new("root", "/").with_method("GET"));

        let verdict = use_case.execute(&mut test, &target()).await.unwrap();

        assert_eq!(verdict, TestStatus::Fail);
        assert_eq!(test.status_code, 200);
    }

    #[tokio::test]
    async fn test_transport_error_is_err() {
        let client = Arc::new(MockHttpClient::error(ProbeError::Timeout {
            timeout_ms: 10_000,
        }));
        let use_case = ExecuteTest::new(client);
        let mut test = normalized(RawTest::new("slow", "/").with_method("GET"));

        let verdict = use_case.execute(&mut test, &target()).await.unwrap();

        assert_eq!(verdict, TestStatus::Err);
        assert_eq!(test.status_code, 0);
        assert!(test.status.is_empty());
        assert_eq!(test.err, Some(ProbeError::Timeout { timeout_ms: 10_000 }));
    }

    #[tokio::test]
    async fn test_sentinel_method_is_never_sent() {
        let client = Arc::new(MockHttpClient::status(403, "403 Forbidden"));
        let use_case = ExecuteTest::new(Arc::clone(&client));
        let mut test = normalized(RawTest::new("no method", "/"));

        let verdict = use_case.execute(&mut test, &target()).await.unwrap();

        assert_eq!(verdict, TestStatus::Err);
        assert!(matches!(test.err, Some(ProbeError::InvalidMethod { .. })));
        assert!(client.sent().is_empty());
        assert_eq!(test.url.as_deref(), Some("http://waf.example.com/"));
    }

    #[tokio::test]
    async fn test_request_carries_headers_and_body() {
        let client = Arc::new(MockHttpClient::status(403, "403 Forbidden"));
        let use_case = ExecuteTest::new(Arc::clone(&client)).with_timeout(Duration::from_secs(3));
        let mut test = normalized(
            RawTest::new("sqli", "//login/../login?x=1")
                .with_method("POST")
                .with_header("Content-Type", "application/x-www-form-urlencoded")
                .with_data("user=admin")
                .with_data("&pass=' OR 1=1--"),
        );

        use_case.execute(&mut test, &target()).await.unwrap();

        let sent = client.sent();
        let request = &sent[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "http://waf.example.com/login?x=1");
        assert_eq!(request.body.as_deref(), Some("user=admin&pass=' OR 1=1--"));
        assert_eq!(request.timeout_ms, 3_000);
        assert_eq!(request.headers.get(IDENTITY_HEADER), Some(&test.id.to_string()));
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_trace_carries_no_body() {
        let use_case = ExecuteTest::new(Arc::new(MockHttpClient::status(200, "200 OK")));
        let test = normalized(RawTest::new("trace", "/").with_method("TRACE").with_data("x"));

        let request = use_case.build_request(&test, &target()).unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn test_empty_data_sends_no_body() {
        let use_case = ExecuteTest::new(Arc::new(MockHttpClient::status(200, "200 OK")));
        let test = normalized(RawTest::new("get", "/").with_method("GET"));

        let request = use_case.build_request(&test, &target()).unwrap();
        assert!(request.body.is_none());
        assert_eq!(request.timeout_ms, 10_000);
    }

    #[tokio::test]
    async fn test_second_execution_is_rejected() {
        let client = Arc::new(MockHttpClient::status(403, "403 Forbidden"));
        let use_case = ExecuteTest::new(Arc::clone(&client));
        let mut test = normalized(RawTest::new("once", "/").with_method("GET"));

        use_case.execute(&mut test, &target()).await.unwrap();
        let again = use_case.execute(&mut test, &target()).await;

        assert!(matches!(again, Err(ApplicationError::Domain(_))));
        assert_eq!(client.sent().len(), 1);
    }
}
