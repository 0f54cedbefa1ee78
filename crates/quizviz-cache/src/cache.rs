//! The image cache store

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::{CacheConfig, CacheEntry, CacheMetrics, CacheStats};

/// In-memory key→entry store with TTL expiry and LRU-style batch eviction.
///
/// A single mutex guards the map so that a read that discovers an expired
/// entry can remove it in the same critical section, and eviction decisions
/// never race with concurrent writers.
pub struct ImageCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    config: CacheConfig,
    metrics: CacheMetrics,
}

impl ImageCache {
    /// Create an empty cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::with_capacity(config.max_entries)),
            config,
            metrics: CacheMetrics::new(),
        }
    }

    /// Look up an entry. Expired entries are removed on sight and count as
    /// misses; a hit refreshes the entry's `last_accessed` timestamp.
    pub async fn get(&self, key: &str) -> Option<CacheEntry> {
        let mut entries = self.entries.lock().await;
        match entries.get_mut(key) {
            Some(entry) if entry.is_expired(self.config.ttl) => {
                debug!(key, "cache entry expired");
                entries.remove(key);
                self.metrics.record_miss();
                None
            }
            Some(entry) => {
                entry.touch();
                self.metrics.record_hit();
                Some(entry.clone())
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Insert an entry, evicting the least-recently-accessed entries first
    /// if the store is at capacity. Inserting an existing key replaces it.
    pub async fn put(&self, entry: CacheEntry) {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(&entry.key) && entries.len() >= self.config.max_entries {
            self.evict_oldest(&mut entries);
        }
        entries.insert(entry.key.clone(), entry);
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        let removed = entries.len();
        entries.clear();
        debug!(removed, "cache cleared");
    }

    /// Number of live entries (expired entries not yet swept included).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Statistics snapshot including the oldest live entry's creation time.
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.lock().await;
        let oldest = entries.values().map(|e| e.created_at).min();
        self.metrics.snapshot(entries.len(), oldest)
    }

    /// Shrink the map to the configured target by dropping the entries with
    /// the oldest `last_accessed` timestamps. Caller holds the lock.
    fn evict_oldest(&self, entries: &mut HashMap<String, CacheEntry>) {
        let target = self.config.evict_target().min(self.config.max_entries);
        if entries.len() < target {
            return;
        }
        let mut by_age: Vec<(String, chrono::DateTime<chrono::Utc>)> = entries
            .iter()
            .map(|(k, e)| (k.clone(), e.last_accessed))
            .collect();
        by_age.sort_by_key(|(_, accessed)| *accessed);

        let to_remove = entries.len() + 1 - target;
        let mut removed = 0u64;
        for (key, _) in by_age.into_iter().take(to_remove) {
            entries.remove(&key);
            removed += 1;
        }
        self.metrics.record_evictions(removed);
        debug!(removed, remaining = entries.len(), "evicted oldest cache entries");
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn entry(key: &str) -> CacheEntry {
        CacheEntry::new(key, format!("content-{key}"), "prompt", "minimal", "stability")
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = ImageCache::default();
        cache.put(entry("q1")).await;
        let found = cache.get("q1").await.unwrap();
        assert_eq!(found.content, "content-q1");
        assert_eq!(found.provider, "stability");
    }

    #[tokio::test]
    async fn test_miss_on_unknown_key() {
        let cache = ImageCache::default();
        assert!(cache.get("nope").await.is_none());
        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed_on_read() {
        let cache = ImageCache::new(CacheConfig {
            ttl: Duration::from_millis(0),
            ..Default::default()
        });
        cache.put(entry("q1")).await;
        std::thread::sleep(Duration::from_millis(2));
        assert!(cache.get("q1").await.is_none());
        // The expired entry was swept, not just hidden
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_hit_refreshes_last_accessed() {
        let cache = ImageCache::default();
        cache.put(entry("q1")).await;
        let first = cache.get("q1").await.unwrap();
        std::thread::sleep(Duration::from_millis(2));
        let second = cache.get("q1").await.unwrap();
        assert!(second.last_accessed > first.last_accessed);
    }

    #[tokio::test]
    async fn test_eviction_shrinks_to_target() {
        let cache = ImageCache::new(CacheConfig {
            max_entries: 8,
            evict_target_ratio: 0.75,
            ..Default::default()
        });
        for i in 0..8 {
            cache.put(entry(&format!("q{i}"))).await;
            // Distinct last_accessed ordering
            std::thread::sleep(Duration::from_millis(1));
        }
        cache.put(entry("q8")).await;

        // target = 6, so the insert leaves 6 entries in the map
        assert_eq!(cache.len().await, 6);
        let stats = cache.stats().await;
        assert_eq!(stats.evictions, 3);
        // The oldest entries went first; the newest is present
        assert!(cache.get("q0").await.is_none());
        assert!(cache.get("q8").await.is_some());
    }

    #[tokio::test]
    async fn test_replacing_existing_key_does_not_evict() {
        let cache = ImageCache::new(CacheConfig {
            max_entries: 2,
            ..Default::default()
        });
        cache.put(entry("a")).await;
        cache.put(entry("b")).await;
        cache.put(entry("a")).await;
        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.stats().await.evictions, 0);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = ImageCache::default();
        cache.put(entry("a")).await;
        cache.put(entry("b")).await;
        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_stats_tracks_oldest_entry() {
        let cache = ImageCache::default();
        cache.put(entry("a")).await;
        std::thread::sleep(Duration::from_millis(2));
        cache.put(entry("b")).await;
        let stats = cache.stats().await;
        assert_eq!(stats.entry_count, 2);
        let oldest = stats.oldest_entry.unwrap();
        let a = cache.get("a").await.unwrap();
        assert_eq!(oldest, a.created_at);
    }
}
