//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the gateway client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Gateway base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request deadline
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// Total attempts before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First retry delay
    #[serde(default = "default_base_delay")]
    pub base_delay: Duration,
    /// Retry delay ceiling
    #[serde(default = "default_max_delay")]
    pub max_delay: Duration,
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(35)
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay() -> Duration {
    Duration::from_millis(250)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(5)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            max_retries: default_max_retries(),
            base_delay: default_base_delay(),
            max_delay: default_max_delay(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry number `attempt` (1-based), doubling each time
    /// and capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        exponential.min(self.max_delay)
    }
}
