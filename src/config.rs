//! Retrieval settings

use serde::Deserialize;
use std::time::Duration;

use crate::error::Result;

/// Total time to wait for the signing key to appear
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Delay between two metadata downloads
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Per-request HTTP timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for polling an IdP metadata endpoint.
///
/// Deserializes from whole seconds, every field optional:
///
/// ```json
/// { "timeout_secs": 600, "interval_secs": 10, "request_timeout_secs": 30 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawConfig")]
pub struct MetadataConfig {
    pub timeout: Duration,
    pub interval: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl MetadataConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the HTTP client used to download metadata
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(self.user_agent.clone())
            .build()?;
        Ok(client)
    }
}

#[derive(Deserialize)]
struct RawConfig {
    timeout_secs: Option<u64>,
    interval_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

impl From<RawConfig> for MetadataConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = MetadataConfig::default();
        Self {
            timeout: raw.timeout_secs.map(Duration::from_secs).unwrap_or(defaults.timeout),
            interval: raw.interval_secs.map(Duration::from_secs).unwrap_or(defaults.interval),
            request_timeout: raw
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            user_agent: raw.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}
