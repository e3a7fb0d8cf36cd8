//! Error types for the UWS client

use thiserror::Error;
use uws_core::UwsError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to a UWS service
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Service returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Response could not be parsed, or a request could not be encoded
    #[error(transparent)]
    Uws(#[from] UwsError),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unusable connection settings
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status or rejected input)
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::ApiError { status, .. } => (400..500).contains(status),
            Self::Uws(err) => err.is_client_fault(),
            Self::InvalidRequest(_) | Self::InvalidConfig(_) => true,
            Self::RequestFailed(_) => false,
        }
    }

    /// Check if this error is a server error (5xx status or non-conformant response)
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::ApiError { status, .. } => *status >= 500,
            Self::Uws(err) => err.is_server_fault(),
            _ => false,
        }
    }
}
