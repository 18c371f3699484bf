//! In-process cache backend
//!
//! Entries live for the lifetime of the process unless a TTL is attached.
//! Expired entries read as absent and are dropped on the next write to the
//! same key or by [`MemoryCache::purge_expired`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::{CacheResult, CacheStore};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Value, ttl: Option<Duration>) -> Self {
        Self {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Memory-backed [`CacheStore`]
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Remove expired entries, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "Purged expired cache entries");
        }
        purged
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }

    async fn add(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_live(now)) {
            return Ok(false);
        }
        entries.insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(true)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let cache = MemoryCache::new();
        assert!(cache.get("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("k", json!(1), None).await.unwrap();
        cache.set("k", json!(2), None).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(json!(2)));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_add_is_create_only() {
        let cache = MemoryCache::new();

        assert!(cache.add("k", json!("first"), None).await.unwrap());
        assert!(!cache.add("k", json!("second"), None).await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), Some(json!("first")));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryCache::new();
        cache.set("k", json!({"page": 1}), None).await.unwrap();
        cache.delete("k").await.unwrap();
        // Deleting twice is fine
        cache.delete("k").await.unwrap();

        assert!(cache.get("k").await.unwrap().is_none());
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let cache = MemoryCache::new();
        cache
            .set("k", json!("v"), Some(Duration::from_secs(10)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(cache.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get("k").await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_restarts_on_write() {
        let cache = MemoryCache::new();
        let ttl = Some(Duration::from_secs(10));
        cache.set("k", json!(1), ttl).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("k", json!(2), ttl).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_replaces_expired_entry() {
        let cache = MemoryCache::new();
        cache
            .set("k", json!("old"), Some(Duration::from_secs(1)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.add("k", json!("new"), None).await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), Some(json!("new")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache
            .set("short", json!(1), Some(Duration::from_secs(1)))
            .await
            .unwrap();
        cache.set("forever", json!(2), None).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("forever").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1), None).await.unwrap();
        cache.set("b", json!(2), None).await.unwrap();

        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
