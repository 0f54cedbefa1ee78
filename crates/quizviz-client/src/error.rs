//! Client-side error types

use thiserror::Error;

/// Errors surfaced by the gateway client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The gateway rejected the request (4xx); never retried
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The gateway asked us to slow down; terminal at the client
    #[error("rate limited by gateway")]
    RateLimited,

    /// The gateway failed server-side
    #[error("gateway returned server error {status}")]
    ServerError { status: u16 },

    /// The request exceeded its deadline
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established at all
    #[error("network unreachable: {0}")]
    NetworkOffline(String),

    /// Transient transport failure mid-request
    #[error("transient network error: {0}")]
    NetworkTransient(String),

    /// Response body did not match the expected shape
    #[error("invalid response from gateway: {0}")]
    InvalidResponse(String),

    /// Bad client configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// The retry budget ran out
    #[error("gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl ClientError {
    /// Whether another attempt may help. Deliberately narrower than the
    /// gateway's own retry set: the gateway has already retried rate limits
    /// and provider failures before this error reached us.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout
                | ClientError::NetworkTransient(_)
                | ClientError::ServerError { .. }
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::NetworkOffline(err.to_string())
        } else {
            ClientError::NetworkTransient(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_set() {
        assert!(ClientError::Timeout.is_retryable());
        assert!(ClientError::NetworkTransient("reset".into()).is_retryable());
        assert!(ClientError::ServerError { status: 502 }.is_retryable());
    }

    #[test]
    fn test_terminal_set() {
        assert!(!ClientError::RateLimited.is_retryable());
        assert!(!ClientError::NetworkOffline("down".into()).is_retryable());
        assert!(!ClientError::Rejected {
            status: 400,
            message: String::new()
        }
        .is_retryable());
        assert!(!ClientError::RetriesExhausted {
            attempts: 3,
            last_error: String::new()
        }
        .is_retryable());
    }
}
