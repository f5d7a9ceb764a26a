//! Error types for kubestale-kube

use thiserror::Error;

/// Result type for kubestale-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors raised while reading live state from the API server
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Base URL cannot be parsed or joined
    #[error("invalid API server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Connection, TLS or body read failure
    #[error("request to {url} failed: {message}\nHint: is the API server reachable (e.g. `kubectl proxy`)?")]
    Network { url: String, message: String },

    /// Non-success status from the API server
    #[error("GET {url} returned HTTP {status}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    /// Body is not JSON, or lacks a field discovery relies on
    #[error("unexpected response from {path}: {message}")]
    UnexpectedResponse { path: String, message: String },
}

impl KubeError {
    pub(crate) fn network(url: &str, e: reqwest::Error) -> Self {
        KubeError::Network {
            url: url.to_string(),
            message: e.to_string(),
        }
    }

    pub(crate) fn unexpected(path: &str, message: impl ToString) -> Self {
        KubeError::UnexpectedResponse {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            KubeError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
