//! Transport to a UWS service
//!
//! `JobServer` is the only place bytes cross the network. It takes an
//! endpoint path relative to the job list plus already-encoded parameters and
//! hands back the raw response body. All protocol logic stays in `uws-core`.

use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Url};
use tracing::{debug, warn};
use uws_core::dto::{QueryParam, to_pairs};

use crate::config::ServerConfig;
use crate::error::{ClientError, Result};

/// Raw request/response exchange with a UWS service
#[async_trait]
pub trait JobServer: Send + Sync {
    /// GET `path` with the given query parameters, in order
    async fn get(&self, path: &str, params: &[QueryParam]) -> Result<Vec<u8>>;

    /// GET that the service may hold open while it waits on the job
    ///
    /// `wait` is how long the service was asked to block, on top of the
    /// usual request time; `None` leaves the limit to the service.
    async fn get_blocking(
        &self,
        path: &str,
        params: &[QueryParam],
        wait: Option<Duration>,
    ) -> Result<Vec<u8>> {
        let _ = wait;
        self.get(path, params).await
    }

    /// POST a form-encoded body to `path`
    async fn post(&self, path: &str, form: &[(String, String)]) -> Result<Vec<u8>>;

    /// DELETE `path`
    async fn delete(&self, path: &str) -> Result<Vec<u8>>;
}

/// `JobServer` over HTTP(S) with optional basic auth
#[derive(Debug, Clone)]
pub struct HttpJobServer {
    /// Job list URL without trailing slash
    url: String,
    /// Parsed job list URL, the base for every endpoint
    base: Url,
    /// Host name, without scheme or port
    host: String,
    /// Path of the job list, without trailing slash
    base_path: String,
    /// Precomputed `Authorization` header value
    authorization: Option<String>,
    /// Per-request timeout; blocking waits extend it
    timeout: Duration,
    client: Client,
}

impl HttpJobServer {
    /// Create a transport from validated settings
    pub fn new(config: &ServerConfig) -> Result<Self> {
        config.validate()?;

        let url = config.url.trim_end_matches('/').to_string();
        let base = Url::parse(&url)
            .map_err(|e| ClientError::InvalidConfig(format!("invalid url '{}': {}", url, e)))?;
        let host = base
            .host_str()
            .ok_or_else(|| ClientError::InvalidConfig(format!("url '{}' has no host", url)))?
            .to_string();
        let base_path = base.path().trim_end_matches('/').to_string();

        let authorization = config.credentials().map(|(user, password)| {
            let token = general_purpose::STANDARD.encode(format!("{}:{}", user, password));
            format!("Basic {}", token)
        });

        // Timeouts are set per request so that blocking waits can outlast them
        let client = Client::builder().build()?;

        Ok(Self {
            url,
            base,
            host,
            base_path,
            authorization,
            timeout: config.timeout,
            client,
        })
    }

    /// Get the job list URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the host name of the service
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Get the path of the job list on the host
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Get the `Authorization` header sent with every request
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Resolve `path` against the job list URL, percent-encoding each segment
    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfig(format!("url '{}' cannot be a base", self.url)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn request(&self, method: Method, path: &str, timeout: Option<Duration>) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        Ok(match &self.authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        })
    }

    /// Check the status code and return the body of a successful response
    async fn handle_response(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("{} answered {}", self.url, status);
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl JobServer for HttpJobServer {
    async fn get(&self, path: &str, params: &[QueryParam]) -> Result<Vec<u8>> {
        debug!("{} query parameter(s)", params.len());
        let response = self
            .request(Method::GET, path, Some(self.timeout))?
            .query(&to_pairs(params))
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn get_blocking(
        &self,
        path: &str,
        params: &[QueryParam],
        wait: Option<Duration>,
    ) -> Result<Vec<u8>> {
        debug!("{} query parameter(s), blocking for {:?}", params.len(), wait);
        let timeout = wait.map(|wait| self.timeout + wait);
        let response = self
            .request(Method::GET, path, timeout)?
            .query(&to_pairs(params))
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn post(&self, path: &str, form: &[(String, String)]) -> Result<Vec<u8>> {
        debug!("{} form field(s)", form.len());
        let response = self
            .request(Method::POST, path, Some(self.timeout))?
            .form(form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<Vec<u8>> {
        let response = self
            .request(Method::DELETE, path, Some(self.timeout))?
            .send()
            .await?;

        self.handle_response(response).await
    }
}
