//! Error taxonomy for provider interactions
//!
//! Every failure is reduced to an [`ErrorClass`] so that retry decisions in
//! the orchestrator and in clients can be made without inspecting vendor
//! error strings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a generation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// No network connectivity at all
    NetworkOffline,
    /// Transient network failure (connection reset, DNS, connect refused)
    NetworkTransient,
    /// The request exceeded its deadline
    Timeout,
    /// Provider returned 429
    RateLimited,
    /// Provider returned 403
    Forbidden,
    /// Provider returned a 5xx status
    ServerError,
    /// The caller abandoned the request
    Aborted,
    /// Anything that does not fit the classes above
    Unknown,
}

impl ErrorClass {
    /// Whether the orchestrator may retry a failure of this class.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorClass::Timeout
                | ErrorClass::NetworkTransient
                | ErrorClass::ServerError
                | ErrorClass::RateLimited
        )
    }
}

/// Errors raised by provider adapters.
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    /// Rate limited by provider
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Access denied (invalid key, exhausted credits); never includes key details
    #[error("access forbidden by provider")]
    Forbidden,

    /// Provider-side failure
    #[error("provider returned {status}: {message}")]
    ServerError { status: u16, message: String },

    /// The request exceeded its deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// The caller abandoned the request
    #[error("request aborted")]
    Aborted,

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The provider responded with something the adapter cannot interpret
    #[error("invalid response from provider: {0}")]
    InvalidResponse(String),

    /// Generic provider failure
    #[error("provider error: {0}")]
    Unexpected(String),
}

impl ProviderError {
    /// Reduce the error to its retry class.
    pub fn class(&self) -> ErrorClass {
        match self {
            ProviderError::RateLimited(_) => ErrorClass::RateLimited,
            ProviderError::Forbidden => ErrorClass::Forbidden,
            ProviderError::ServerError { .. } => ErrorClass::ServerError,
            ProviderError::Timeout(_) => ErrorClass::Timeout,
            ProviderError::Network(_) => ErrorClass::NetworkTransient,
            ProviderError::Aborted => ErrorClass::Aborted,
            ProviderError::ConfigError(_)
            | ProviderError::InvalidResponse(_)
            | ProviderError::Unexpected(_) => ErrorClass::Unknown,
        }
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => ProviderError::RateLimited(60),
            403 => ProviderError::Forbidden,
            s if (500..600).contains(&s) => ProviderError::ServerError { status: s, message },
            s => ProviderError::Unexpected(format!("unexpected status {s}: {message}")),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(Duration::from_secs(30))
        } else if err.is_connect() {
            ProviderError::Network(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::from_status(status.as_u16(), err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}
