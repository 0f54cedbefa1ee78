//! Cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tuning knobs for the image cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long an entry stays valid after creation
    pub ttl: Duration,
    /// Maximum number of entries before eviction kicks in
    pub max_entries: usize,
    /// Fraction of `max_entries` to shrink to when evicting (0.0..=1.0)
    pub evict_target_ratio: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_entries: 50,
            evict_target_ratio: 0.75,
        }
    }
}

impl CacheConfig {
    /// Load configuration from the environment, falling back to defaults.
    ///
    /// Recognized variables: `QUIZVIZ_CACHE_TTL_SECS`,
    /// `QUIZVIZ_CACHE_MAX_ENTRIES`, `QUIZVIZ_CACHE_EVICT_TARGET`.
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("QUIZVIZ_CACHE_TTL_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => config.ttl = Duration::from_secs(secs),
                Err(_) => warn!("ignoring invalid QUIZVIZ_CACHE_TTL_SECS: {raw}"),
            }
        }
        if let Ok(raw) = std::env::var("QUIZVIZ_CACHE_MAX_ENTRIES") {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => config.max_entries = n,
                _ => warn!("ignoring invalid QUIZVIZ_CACHE_MAX_ENTRIES: {raw}"),
            }
        }
        if let Ok(raw) = std::env::var("QUIZVIZ_CACHE_EVICT_TARGET") {
            match raw.parse::<f64>() {
                Ok(ratio) if (0.0..=1.0).contains(&ratio) => config.evict_target_ratio = ratio,
                _ => warn!("ignoring invalid QUIZVIZ_CACHE_EVICT_TARGET: {raw}"),
            }
        }

        config
    }

    /// Entry count to shrink to during an eviction pass.
    pub fn evict_target(&self) -> usize {
        ((self.max_entries as f64 * self.evict_target_ratio) as usize).max(1)
    }
}
