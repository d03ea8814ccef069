use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A validated snapshot, serialized to JSON, valid until `expires_at` (epoch seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: String,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub hit_count: u64,
    pub miss_count: u64,
}

/// Cache seam injected into the client. Expiry is checked lazily against the
/// `now` the caller passes in.
#[async_trait]
pub trait ContentCache: Send + Sync {
    /// Live payload for `key`; counts a hit or a miss.
    async fn get(&self, key: &str, now: i64) -> Option<String>;
    /// Like `get` but leaves the counters alone.
    async fn peek(&self, key: &str, now: i64) -> Option<String>;
    async fn put(&self, entry: CacheEntry);
    async fn clear(&self);
    async fn stats(&self, now: i64) -> CacheStats;
}
