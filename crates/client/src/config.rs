//! Client configuration
//!
//! Configuration for the JSON:API connection with builder-style
//! construction and environment overrides.

use std::env;
use std::time::Duration;

use flock_domain::{ApiError, Result};

const ENV_BASE_URL: &str = "FLOCK_API_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "FLOCK_API_TIMEOUT_SECS";
const ENV_USER_AGENT: &str = "FLOCK_API_USER_AGENT";

/// Configuration for the API connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the API (e.g. "https://api.flockhq.com/v2")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    /// User agent reported to the server
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.flockhq.com/v2".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("flock-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Start building a configuration
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build a configuration from environment overrides.
    ///
    /// Reads `FLOCK_API_BASE_URL`, `FLOCK_API_TIMEOUT_SECS` and
    /// `FLOCK_API_USER_AGENT`; unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` when the timeout is not a whole
    /// number of seconds.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder();

        if let Ok(base_url) = env::var(ENV_BASE_URL) {
            builder = builder.base_url(base_url);
        }
        if let Ok(secs) = env::var(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| {
                ApiError::InvalidInput(format!(
                    "{} must be a whole number of seconds",
                    ENV_TIMEOUT_SECS
                ))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Ok(user_agent) = env::var(ENV_USER_AGENT) {
            builder = builder.user_agent(user_agent);
        }

        builder.build()
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    /// Set the API base URL; a trailing slash is trimmed
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the reported user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` when the base URL is empty.
    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();

        let base_url = self.base_url.unwrap_or(defaults.base_url);
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidInput("base_url must not be empty".into()));
        }

        Ok(ClientConfig {
            base_url,
            timeout: self.timeout.unwrap_or(defaults.timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        })
    }
}
