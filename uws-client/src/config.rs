//! Connection configuration
//!
//! Where the UWS service lives and how to authenticate against it.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default request timeout. Long-poll waits should stay below it.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for connecting to a UWS service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL of the job list (e.g., "https://example.com/tap/async")
    pub url: String,

    /// Basic auth user
    pub user: Option<String>,

    /// Basic auth password
    pub password: Option<String>,

    /// Timeout applied to every request
    pub timeout: Duration,
}

impl ServerConfig {
    /// Creates a configuration without credentials
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - UWS_URL (required)
    /// - UWS_USER (optional)
    /// - UWS_PASSWORD (optional, required with UWS_USER)
    /// - UWS_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("UWS_URL").map_err(|_| {
            ClientError::InvalidConfig("UWS_URL environment variable not set".to_string())
        })?;

        let timeout = std::env::var("UWS_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Ok(Self {
            url,
            user: std::env::var("UWS_USER").ok(),
            password: std::env::var("UWS_PASSWORD").ok(),
            timeout,
        })
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The `(user, password)` pair, when both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.user.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(ClientError::InvalidConfig(message.to_string()))
        };

        if self.url.is_empty() {
            return invalid("url cannot be empty");
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return invalid("url must start with http:// or https://");
        }

        if self.user.is_some() != self.password.is_some() {
            return invalid("user and password must be given together");
        }

        if self.timeout.is_zero() {
            return invalid("timeout must be greater than 0");
        }

        Ok(())
    }
}
