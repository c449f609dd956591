//! Target host and URL construction.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Bytes that cannot appear raw in a request target. Everything else,
/// `%`, `.` and `\` included, goes out exactly as written.
const REQUEST_TARGET_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`');

/// URL scheme used to reach the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS (default).
    #[default]
    Https,
}

impl Scheme {
    /// Returns the scheme as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(DomainError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// The system under test: a bare host (FQDN or IP, optional port) plus the
/// scheme to reach it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    scheme: Scheme,
    host: String,
}

impl Target {
    /// Creates a validated target.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidHost`] if the host is empty, carries a
    /// scheme, path, query or credentials, or is not a valid authority.
    pub fn new(scheme: Scheme, host: impl Into<String>) -> DomainResult<Self> {
        let host = host.into().trim().to_string();

        if host.is_empty() {
            return Err(DomainError::InvalidHost("host cannot be empty".to_string()));
        }
        if host.contains("://") {
            return Err(DomainError::InvalidHost(format!(
                "{host}: host must not include a scheme"
            )));
        }
        if host.contains(['/', '?', '#', '@']) {
            return Err(DomainError::InvalidHost(format!(
                "{host}: expected a bare FQDN or IP address"
            )));
        }

        let parsed = Url::parse(&format!("{scheme}://{host}/"))
            .map_err(|e| DomainError::InvalidHost(format!("{host}: {e}")))?;
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(DomainError::InvalidHost(host));
        }

        Ok(Self { scheme, host })
    }

    /// Returns the scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Returns the host as given.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Resolves a test path against this target.
    ///
    /// The path is cleaned with [`clean_path`], so it can never climb out of
    /// the host's authority. The result is the exact URL put on the wire:
    /// percent sequences and dot-like segments such as `%2e%2e` are not
    /// decoded, and only bytes that a request line cannot carry (controls,
    /// space, `"`, `#`, `<`, `>`, `` ` `` and non-ASCII) are percent-encoded.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let request_target = clean_path(path);
        format!(
            "{}://{}{}",
            self.scheme,
            self.host,
            utf8_percent_encode(&request_target, REQUEST_TARGET_ESCAPES)
        )
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

/// Cleans the path component of a request target.
///
/// Repeated slashes collapse, `.` segments are dropped and `..` removes the
/// previous segment but never goes above the root. The result is always
/// rooted and carries no trailing slash (except for `/` itself). Anything
/// from the first `?` onwards is treated as the query and kept verbatim.
#[must_use]
pub fn clean_path(path: &str) -> String {
    let (path_part, query) = match path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path, None),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in path_part.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    cleaned.push('/');
    cleaned.push_str(&segments.join("/"));
    if let Some(query) = query {
        cleaned.push('?');
        cleaned.push_str(query);
    }
    cleaned
}
