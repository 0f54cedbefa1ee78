//! Cache entry type

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

/// A cached generation result together with the inputs that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Request identity this entry was stored under
    pub key: String,
    /// Generated content (image URL or inline markup)
    pub content: String,
    /// The compiled prompt that was sent to the provider
    pub prompt_used: String,
    /// Style the image was generated with
    pub style: String,
    /// Provider that produced the content
    pub provider: String,
    /// When the entry was created
    pub created_at: DateTime<Utc>,
    /// When the entry was last returned to a caller
    pub last_accessed: DateTime<Utc>,
}

impl CacheEntry {
    /// Create a new entry with both timestamps set to now.
    pub fn new(
        key: impl Into<String>,
        content: impl Into<String>,
        prompt_used: impl Into<String>,
        style: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            key: key.into(),
            content: content.into(),
            prompt_used: prompt_used.into(),
            style: style.into(),
            provider: provider.into(),
            created_at: now,
            last_accessed: now,
        }
    }

    /// Check whether the entry is older than the given TTL.
    pub fn is_expired(&self, ttl: std::time::Duration) -> bool {
        let ttl = ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX);
        Utc::now() - self.created_at > ttl
    }

    /// Mark the entry as freshly read.
    pub fn touch(&mut self) {
        self.last_accessed = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_not_expired() {
        let entry = CacheEntry::new("k", "content", "prompt", "minimal", "stability");
        assert!(!entry.is_expired(std::time::Duration::from_secs(60)));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let mut entry = CacheEntry::new("k", "content", "prompt", "minimal", "stability");
        entry.created_at = Utc::now() - ChronoDuration::seconds(10);
        assert!(entry.is_expired(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn test_touch_advances_last_accessed() {
        let mut entry = CacheEntry::new("k", "content", "prompt", "minimal", "stability");
        let before = entry.last_accessed;
        std::thread::sleep(std::time::Duration::from_millis(2));
        entry.touch();
        assert!(entry.last_accessed > before);
    }
}
