//! Raw test records as handed over by a fixture loader.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A declarative test definition before normalization.
///
/// Every optional field may be left empty by the loader; the normalizer
/// fills in defaults. Header names are kept as written in the fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTest {
    /// Test title.
    pub title: String,
    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Label of the fixture file this record came from.
    #[serde(default)]
    pub source_file: String,
    /// HTTP method, if the fixture names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Request path, optionally followed by a query string.
    pub path: String,
    /// Request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Body fragments, concatenated in order.
    #[serde(default)]
    pub data: Vec<String>,
    /// Acceptable response status codes.
    #[serde(default)]
    pub expected_status_codes: Vec<u16>,
}

impl RawTest {
    /// Creates a record with a title and path and everything else empty.
    #[must_use]
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the source file label (builder pattern).
    #[must_use]
    pub fn with_source_file(mut self, source_file: impl Into<String>) -> Self {
        self.source_file = source_file.into();
        self
    }

    /// Sets the HTTP method (builder pattern).
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Adds a header (builder pattern).
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Appends a body fragment (builder pattern).
    #[must_use]
    pub fn with_data(mut self, fragment: impl Into<String>) -> Self {
        self.data.push(fragment.into());
        self
    }

    /// Sets the expected status codes (builder pattern).
    #[must_use]
    pub fn with_expected_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.expected_status_codes = codes.into_iter().collect();
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_minimal_record() {
        let raw: RawTest = serde_json::from_str(r#"{"title": "t1", "path": "/admin"}"#).unwrap();
        assert_eq!(raw.title, "t1");
        assert_eq!(raw.path, "/admin");
        assert!(raw.description.is_none());
        assert!(raw.method.is_none());
        assert!(raw.headers.is_empty());
        assert!(raw.data.is_empty());
        assert!(raw.expected_status_codes.is_empty());
    }

    #[test]
    fn test_deserialize_full_record() {
        let raw: RawTest = serde_json::from_str(
            r#"{
                "title": "sqli",
                "description": "classic tautology",
                "source_file": "sqli.yaml",
                "method": "POST",
                "path": "/login",
                "headers": {"Content-Type": "application/x-www-form-urlencoded"},
                "data": ["user=admin", "&pass=' OR 1=1--"],
                "expected_status_codes": [403, 406]
            }"#,
        )
        .unwrap();

        assert_eq!(raw.method.as_deref(), Some("POST"));
        assert_eq!(raw.data.len(), 2);
        assert_eq!(raw.expected_status_codes, vec![403, 406]);
        assert_eq!(
            raw.headers.get("Content-Type").map(String::as_str),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_builder() {
        let raw = RawTest::new("xss", "/search")
            .with_method("GET")
            .with_header("User-Agent", "<script>")
            .with_data("a")
            .with_data("b")
            .with_expected_status_codes([403]);

        assert_eq!(raw.method.as_deref(), Some("GET"));
        assert_eq!(raw.data, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(raw.expected_status_codes, vec![403]);
    }
}
