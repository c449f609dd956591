//! Run configuration.
//!
//! Values come from whatever layer embeds the tester (flags, a file, the
//! environment); this type only carries and validates them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::target::{Scheme, Target};

/// Timeout of a single probe when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Number of probes in flight at once when none is configured.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Environment variable naming the target host.
pub const ENV_HOST: &str = "WAF_TESTER_HOST";
/// Environment variable naming the URL scheme.
pub const ENV_SCHEME: &str = "WAF_TESTER_SCHEME";
/// Environment variable naming the probe timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "WAF_TESTER_TIMEOUT_SECS";
/// Environment variable naming the probe concurrency.
pub const ENV_CONCURRENCY: &str = "WAF_TESTER_CONCURRENCY";

/// Parameters of one test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// FQDN or IP address of the host to test, without scheme.
    pub host: String,

    /// Scheme used to reach the host.
    #[serde(default)]
    pub scheme: Scheme,

    /// Hard timeout of each probe, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of probes in flight.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl RunConfig {
    /// Creates a configuration for `host` with default settings.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            scheme: Scheme::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets the scheme (builder pattern).
    #[must_use]
    pub const fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the probe timeout (builder pattern).
    #[must_use]
    pub const fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the concurrency (builder pattern).
    #[must_use]
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Builds a configuration from a variable lookup, usually
    /// `|key| std::env::var(key).ok()`.
    ///
    /// Unset variables fall back to the defaults; the host has no default.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse.
    pub fn from_lookup<F>(lookup: F) -> DomainResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup(ENV_HOST).unwrap_or_default());

        if let Some(scheme) = lookup(ENV_SCHEME) {
            config.scheme = scheme.parse()?;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                DomainError::InvalidConfig(format!("{ENV_TIMEOUT_SECS}={timeout} is not a number"))
            })?;
        }
        if let Some(concurrency) = lookup(ENV_CONCURRENCY) {
            config.concurrency = concurrency.trim().parse().map_err(|_| {
                DomainError::InvalidConfig(format!(
                    "{ENV_CONCURRENCY}={concurrency} is not a number"
                ))
            })?;
        }

        Ok(config)
    }

    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`RunConfig::from_lookup`].
    pub fn from_env() -> DomainResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Checks the configuration and resolves the target.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is invalid or a numeric setting is zero.
    pub fn validate(&self) -> DomainResult<Target> {
        if self.timeout_secs == 0 {
            return Err(DomainError::InvalidConfig(
                "timeout must be at least one second".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(DomainError::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Target::new(self.scheme, self.host.clone())
    }

    /// Returns the probe timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
