//! HTTP Client implementation using hyper.
//!
//! This adapter implements the `HttpClient` port on top of the hyper client.
//! The request target is handed to hyper as an `http::Uri`, which is never
//! normalized, so fixture paths such as `/%2e%2e/etc/passwd` or
//! `/..\win.ini` reach the target byte for byte. One pooled client is shared
//! by every probe of a run.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode, Uri};
use http_body_util::Full;
use hyper::ext::ReasonPhrase;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use tracing::debug;
use url::Url;
use waftest_application::ports::HttpClient;
use waftest_domain::{ProbeError, ProbeRequest, ProbeResponse};

use crate::error::InfrastructureError;

/// Maximum number of redirects followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// User-Agent sent when the fixture does not set one.
const DEFAULT_USER_AGENT: &str = concat!("waf-tester/", env!("CARGO_PKG_VERSION"));

type PooledClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// HTTP client implementation using hyper.
#[derive(Clone)]
pub struct HyperHttpClient {
    client: PooledClient,
}

impl fmt::Debug for HyperHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperHttpClient").finish_non_exhaustive()
    }
}

impl HyperHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - HTTP and HTTPS, HTTP/1.1 and HTTP/2 (negotiated via ALPN)
    /// - TLS verification against the webpki root store
    /// - Follow redirects: up to 10
    /// - User-Agent: "waf-tester/<version>" unless the test sets one
    ///
    /// # Errors
    ///
    /// Returns [`InfrastructureError::Tls`] if the TLS configuration cannot
    /// be built.
    pub fn new() -> Result<Self, InfrastructureError> {
        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
            .map_err(|e| InfrastructureError::Tls(e.to_string()))?
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self { client })
    }

    /// Creates a new HTTP client around a preconfigured hyper client.
    #[must_use]
    pub const fn with_client(client: PooledClient) -> Self {
        Self { client }
    }

    /// Sends `request` and follows redirects until a final response.
    async fn exchange(
        client: &PooledClient,
        mut request: PreparedRequest,
    ) -> Result<ProbeResponse, ProbeError> {
        let mut redirects = 0;
        loop {
            let response = client
                .request(request.to_http())
                .await
                .map_err(|e| map_error(&e, &request.uri))?;
            let status = response.status();

            match request.redirect(status, response.headers().get(LOCATION))? {
                Some(_) if redirects == MAX_REDIRECTS => {
                    return Err(ProbeError::Other {
                        message: format!("stopped after {MAX_REDIRECTS} redirects"),
                    });
                }
                Some(next) => {
                    debug!(
                        from = %request.uri,
                        to = %next.uri,
                        status = status.as_u16(),
                        "following redirect"
                    );
                    redirects += 1;
                    request = next;
                }
                None => {
                    // Dropping the response releases the body unread.
                    return Ok(ProbeResponse::new(status.as_u16(), status_line(&response)));
                }
            }
        }
    }
}

/// A validated request, ready to be sent (and re-sent on redirects).
#[derive(Debug, Clone)]
struct PreparedRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl PreparedRequest {
    /// Validates method, URL and headers of a probe.
    ///
    /// Headers are inserted, not appended, so names differing only in case
    /// collapse to one header; the last one in map order wins.
    fn prepare(request: &ProbeRequest) -> Result<Self, ProbeError> {
        let method =
            Method::from_bytes(request.method.as_bytes()).map_err(|_| ProbeError::InvalidMethod {
                method: request.method.clone(),
            })?;
        let uri = parse_uri(&request.url)?;

        let mut headers = HeaderMap::with_capacity(request.headers.len() + 1);
        for (name, value) in &request.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ProbeError::InvalidHeader {
                    name: name.clone(),
                    message: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| ProbeError::InvalidHeader {
                name: name.clone(),
                message: e.to_string(),
            })?;
            headers.insert(header_name, header_value);
        }
        if !headers.contains_key(USER_AGENT) {
            headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        }

        Ok(Self {
            method,
            uri,
            headers,
            body: request.body.clone().map(Bytes::from),
        })
    }

    fn to_http(&self) -> Request<Full<Bytes>> {
        let body = self.body.clone().map(Full::new).unwrap_or_default();
        let mut request = Request::new(body);
        *request.method_mut() = self.method.clone();
        *request.uri_mut() = self.uri.clone();
        *request.headers_mut() = self.headers.clone();
        request
    }

    /// Returns the follow-up request if `status` redirects, `None` if the
    /// response is final.
    ///
    /// 301 and 302 turn `POST` into `GET`, 303 turns everything but `HEAD`
    /// into `GET`; these drop the body. 307 and 308 resend as-is.
    fn redirect(
        &self,
        status: StatusCode,
        location: Option<&HeaderValue>,
    ) -> Result<Option<Self>, ProbeError> {
        let method = match status {
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND if self.method == Method::POST => {
                Method::GET
            }
            StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => self.method.clone(),
            StatusCode::SEE_OTHER if self.method == Method::HEAD => Method::HEAD,
            StatusCode::SEE_OTHER => Method::GET,
            StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT => self.method.clone(),
            _ => return Ok(None),
        };
        let Some(location) = location.and_then(|v| v.to_str().ok()) else {
            return Ok(None);
        };

        let base = self.uri.to_string();
        let next = Url::parse(&base)
            .and_then(|base| base.join(location))
            .map_err(|e| ProbeError::InvalidUrl {
                url: location.to_string(),
                message: e.to_string(),
            })?;

        let keep_body = matches!(
            status,
            StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
        );
        let mut headers = self.headers.clone();
        if !keep_body {
            headers.remove(CONTENT_TYPE);
            headers.remove(CONTENT_LENGTH);
        }

        Ok(Some(Self {
            method,
            uri: parse_uri(next.as_str())?,
            headers,
            body: if keep_body { self.body.clone() } else { None },
        }))
    }
}

/// Parses an absolute URL into a request URI without normalizing its path.
fn parse_uri(url: &str) -> Result<Uri, ProbeError> {
    let uri = Uri::try_from(url).map_err(|e| ProbeError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(ProbeError::InvalidUrl {
            url: url.to_string(),
            message: "expected an absolute URL".to_string(),
        });
    }
    Ok(uri)
}

/// Renders the status line, keeping the server's own reason phrase
/// (e.g. "403 Request Blocked") and falling back to the canonical one.
fn status_line<B>(response: &Response<B>) -> String {
    let code = response.status().as_u16();
    let reason = response.extensions().get::<ReasonPhrase>().map_or_else(
        || {
            response
                .status()
                .canonical_reason()
                .unwrap_or_default()
                .to_string()
        },
        |phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
    );

    if reason.is_empty() {
        code.to_string()
    } else {
        format!("{code} {reason}")
    }
}

/// Maps hyper client errors to `ProbeError`.
fn map_error(error: &hyper_util::client::legacy::Error, uri: &Uri) -> ProbeError {
    let message = error_chain(error);
    let lowered = message.to_lowercase();
    let host = uri.host().unwrap_or("unknown").to_string();

    if error.is_connect() {
        if lowered.contains("dns")
            || lowered.contains("resolve")
            || lowered.contains("failed to lookup")
        {
            return ProbeError::Dns { host, message };
        }
        if lowered.contains("refused") {
            let port = uri.port_u16().unwrap_or_else(|| {
                if uri.scheme_str() == Some("https") {
                    443
                } else {
                    80
                }
            });
            return ProbeError::ConnectionRefused { host, port };
        }
        if lowered.contains("certificate") || lowered.contains("tls") {
            return ProbeError::Tls { message };
        }
        return ProbeError::ConnectionFailed { message };
    }

    ProbeError::Other { message }
}

/// Joins an error and all its sources into one message.
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

impl HttpClient for HyperHttpClient {
    fn execute(
        &self,
        request: &ProbeRequest,
    ) -> impl Future<Output = Result<ProbeResponse, ProbeError>> + Send {
        let prepared = PreparedRequest::prepare(request);
        let client = self.client.clone();
        let timeout_ms = request.timeout_ms;

        async move {
            let prepared = prepared?;
            tokio::time::timeout(
                Duration::from_millis(timeout_ms),
                Self::exchange(&client, prepared),
            )
            .await
            .unwrap_or_else(|_| Err(ProbeError::Timeout { timeout_ms }))
        }
    }
}
