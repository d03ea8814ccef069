use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::storage::{CacheEntry, CacheStats, ContentCache};

/// Process-local cache. Construct once and share it (behind an `Arc`) with
/// every client; nothing is persisted.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    pub fn new() -> Self { Self::default() }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lookup(&self, key: &str, now: i64) -> Option<String> {
        let mut entries = self.entries();
        match entries.get(key) {
            Some(e) if e.expires_at > now => Some(e.payload.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}

#[async_trait]
impl ContentCache for MemoryCache {
    async fn get(&self, key: &str, now: i64) -> Option<String> {
        let hit = self.lookup(key, now);
        let counter = if hit.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        hit
    }

    async fn peek(&self, key: &str, now: i64) -> Option<String> { self.lookup(key, now) }

    async fn put(&self, entry: CacheEntry) {
        self.entries().insert(entry.key.clone(), entry);
    }

    async fn clear(&self) {
        self.entries().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    async fn stats(&self, now: i64) -> CacheStats {
        let entry_count = self.entries().values().filter(|e| e.expires_at > now).count();
        CacheStats {
            entry_count,
            hit_count: self.hits.load(Ordering::Relaxed),
            miss_count: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, expires_at: i64) -> CacheEntry {
        CacheEntry { key: key.to_string(), payload: format!("[\"{key}\"]"), expires_at }
    }

    #[tokio::test]
    async fn hit_until_expiry_then_miss() {
        let cache = MemoryCache::new();
        cache.put(entry("a", 110)).await;
        assert_eq!(cache.get("a", 100).await.as_deref(), Some("[\"a\"]"));
        assert_eq!(cache.get("a", 110).await, None);
        let stats = cache.stats(100).await;
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.entry_count, 0, "expired entry is dropped on read");
    }

    #[tokio::test]
    async fn peek_does_not_count() {
        let cache = MemoryCache::new();
        cache.put(entry("a", 200)).await;
        assert!(cache.peek("a", 100).await.is_some());
        assert!(cache.peek("b", 100).await.is_none());
        assert_eq!(cache.stats(100).await, CacheStats { entry_count: 1, hit_count: 0, miss_count: 0 });
    }

    #[tokio::test]
    async fn put_replaces_and_clear_resets() {
        let cache = MemoryCache::new();
        cache.put(entry("a", 200)).await;
        cache.put(CacheEntry { key: "a".into(), payload: "[]".into(), expires_at: 300 }).await;
        assert_eq!(cache.get("a", 250).await.as_deref(), Some("[]"));
        cache.clear().await;
        assert_eq!(cache.stats(0).await, CacheStats::default());
        assert!(cache.peek("a", 0).await.is_none());
    }
}
