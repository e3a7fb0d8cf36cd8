//! UWS HTTP Client
//!
//! An asynchronous client for IVOA Universal Worker Service endpoints.
//!
//! The client joins three pieces: the request encoders and XML models of
//! `uws-core`, and a [`JobServer`] transport. [`HttpJobServer`] is the
//! reqwest-backed transport; tests and embedders can supply their own.
//!
//! # Example
//!
//! ```no_run
//! use uws_client::{ServerConfig, UwsClient};
//! use uws_core::dto::ListFilter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = UwsClient::connect(&ServerConfig::new("https://example.com/tap/async"))?;
//!
//!     let filter = ListFilter::new().with_phase("EXECUTING").with_last("10");
//!     for job_ref in client.get_job_list(&filter).await?.iter() {
//!         println!("{}", job_ref);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod jobs;
pub mod server;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{ClientError, Result};
pub use server::{HttpJobServer, JobServer};

/// Client for one UWS job list
///
/// Operations are grouped by concern:
/// - Job list queries with filters
/// - Job retrieval, including blocking waits
/// - Job lifecycle (create, parameterize, run, abort, delete)
#[derive(Debug, Clone)]
pub struct UwsClient<S = HttpJobServer> {
    server: S,
}

impl UwsClient<HttpJobServer> {
    /// Create a client talking HTTP to the configured service
    ///
    /// # Example
    /// ```
    /// use uws_client::{ServerConfig, UwsClient};
    ///
    /// let config = ServerConfig::new("http://localhost:8080/uws").with_credentials("admin", "admin");
    /// let client = UwsClient::connect(&config).unwrap();
    /// assert_eq!(client.server().base_path(), "/uws");
    /// ```
    pub fn connect(config: &ServerConfig) -> Result<Self> {
        Ok(Self::new(HttpJobServer::new(config)?))
    }
}

impl<S: JobServer> UwsClient<S> {
    /// Create a client over any transport
    pub fn new(server: S) -> Self {
        Self { server }
    }

    /// Get the underlying transport
    pub fn server(&self) -> &S {
        &self.server
    }
}
