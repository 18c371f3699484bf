//! Cache layer
//!
//! A small async key-value contract with per-key expiry. Everything the
//! reader keeps between requests (paginated books, user sessions) lives
//! behind it.
//!
//! ## Contract
//!
//! - `get`: absence is `Ok(None)`, never an error
//! - `set`: unconditional upsert
//! - `add`: create-only insert, reports whether it happened
//! - `delete`: removes the key if present
//!
//! A TTL is measured from the last write. Once it elapses the key reads as
//! absent. The store has no read-modify-write primitive; callers that need
//! one serialize access themselves (see [`crate::locks::KeyedLocks`]).

mod error;
mod memory;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use error::{CacheError, CacheResult};
pub use memory::MemoryCache;

/// Async key-value store with optional per-key expiry
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value, `None` when missing or expired
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Write a value, replacing whatever was there
    async fn set(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<()>;

    /// Write a value only if the key is absent
    ///
    /// Returns `true` when the value was inserted.
    async fn add(&self, key: &str, value: Value, ttl: Option<Duration>) -> CacheResult<bool>;

    /// Remove a key
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check whether a live value exists under `key`
    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

impl dyn CacheStore {
    /// Read and decode a typed value
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        match self.get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| CacheError::Serialization {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encode and write a typed value
    pub async fn set_as<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let value = serde_json::to_value(value).map_err(|source| CacheError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.set(key, value, ttl).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_typed_round_trip_through_dyn_store() {
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());

        let mut pages = BTreeMap::new();
        pages.insert(1u32, "one".to_string());
        pages.insert(2u32, "two".to_string());
        cache.set_as("book_1", &pages, None).await.unwrap();

        // Integer keys are stringified at the storage boundary
        let raw = cache.get("book_1").await.unwrap().unwrap();
        assert_eq!(raw["1"], "one");

        let back: BTreeMap<u32, String> = cache.get_as("book_1").await.unwrap().unwrap();
        assert_eq!(back, pages);
    }

    #[tokio::test]
    async fn test_get_as_reports_shape_mismatch() {
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
        cache
            .set("user_data_1", Value::String("garbage".into()), None)
            .await
            .unwrap();

        let err = cache.get_as::<Vec<u32>>("user_data_1").await.unwrap_err();
        assert!(matches!(err, CacheError::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_exists_default_impl() {
        let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
        assert!(!cache.exists("k").await.unwrap());
        cache.set("k", Value::Bool(true), None).await.unwrap();
        assert!(cache.exists("k").await.unwrap());
    }
}
