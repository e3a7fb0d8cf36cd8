//! Configuration module
//!
//! Connection settings and output mode shared by all commands.

use anyhow::{Context, Result};
use uws_client::{ServerConfig, UwsClient};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the job list lives and how to authenticate
    pub server: ServerConfig,

    /// Print JSON instead of formatted output
    pub json: bool,
}

impl Config {
    /// Build an HTTP client for the configured service
    pub fn client(&self) -> Result<UwsClient> {
        UwsClient::connect(&self.server)
            .with_context(|| format!("Cannot connect to {}", self.server.url))
    }
}
