//! In-memory cache for generated quiz images
//!
//! Keys are image request identities; values carry the generated content
//! plus the prompt and style that produced it. Entries expire after a TTL
//! and the store evicts the least-recently-accessed entries in a batch when
//! it grows past its capacity. All operations are infallible: a damaged or
//! expired entry is simply a miss.

pub mod cache;
pub mod config;
pub mod entry;
pub mod metrics;

pub use cache::ImageCache;
pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use metrics::{CacheMetrics, CacheStats};
