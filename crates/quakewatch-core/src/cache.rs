//! In-memory TTL caching for feed results.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cache behavior for one service call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Read a non-expired entry if present; otherwise fetch and write. (Default)
    #[default]
    Use,
    /// Always fetch, bypassing any cached entry, and write the new result.
    Refresh,
    /// Always fetch; neither read from nor write to the cache.
    Bypass,
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: Instant,
    ttl: Duration,
}

#[derive(Debug)]
struct CacheInner<T> {
    map: HashMap<String, CacheEntry<T>>,
    default_ttl: Duration,
}

impl<T: Clone> CacheInner<T> {
    fn new(default_ttl: Duration) -> Self {
        Self {
            map: HashMap::new(),
            default_ttl,
        }
    }

    fn get(&self, key: &str) -> Option<T> {
        self.map.get(key).and_then(|entry| {
            if entry.stored_at.elapsed() <= entry.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, key: String, value: T, ttl_override: Option<Duration>) {
        let ttl = ttl_override.unwrap_or(self.default_ttl);
        self.map.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        self.map
            .get(key)
            .and_then(|entry| entry.ttl.checked_sub(entry.stored_at.elapsed()))
            .filter(|remaining| !remaining.is_zero())
    }

    fn clear_expired(&mut self) {
        self.map
            .retain(|_, entry| entry.stored_at.elapsed() <= entry.ttl);
    }
}

/// Thread-safe in-memory cache with per-entry TTLs.
///
/// A single backing tier; entries are dropped on expiry rather than mirrored
/// to persistent storage.
#[derive(Debug, Clone)]
pub struct CacheStore<T> {
    inner: Arc<tokio::sync::RwLock<CacheInner<T>>>,
}

impl<T: Clone> CacheStore<T> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner::new(default_ttl))),
        }
    }

    /// Cache with a default TTL of 5 minutes.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(300))
    }

    /// Disabled cache: every `get` misses and every `put` is a no-op.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Get a cached value if present and not expired.
    pub async fn get(&self, key: &str) -> Option<T> {
        let store = self.inner.read().await;
        store.get(key)
    }

    /// Store a value, with `ttl_override` taking precedence over the
    /// default TTL. No-op when the cache is disabled.
    pub async fn put(&self, key: String, value: T, ttl_override: Option<Duration>) {
        let mut store = self.inner.write().await;

        if store.default_ttl == Duration::ZERO {
            return;
        }

        store.put(key, value, ttl_override);
    }

    /// Time left before the entry under `key` expires, if any.
    pub async fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let store = self.inner.read().await;
        store.remaining_ttl(key)
    }

    pub async fn has(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    /// Drop expired entries.
    pub async fn clear_expired(&self) {
        let mut store = self.inner.write().await;
        store.clear_expired();
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }

    /// Entry count, expired entries included.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_put_get_overwrite() {
        let cache = CacheStore::new(Duration::from_secs(1));

        assert!(cache.get("feed").await.is_none());

        cache.put("feed".to_string(), 1u32, None).await;
        assert_eq!(cache.get("feed").await, Some(1));

        cache.put("feed".to_string(), 2u32, None).await;
        assert_eq!(cache.get("feed").await, Some(2));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = CacheStore::new(Duration::from_millis(50));

        cache.put("feed".to_string(), 1u32, None).await;
        assert!(cache.has("feed").await);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get("feed").await.is_none());
    }

    #[tokio::test]
    async fn ttl_override_beats_default() {
        let cache = CacheStore::new(Duration::from_secs(60));

        cache
            .put("feed".to_string(), 1u32, Some(Duration::from_millis(50)))
            .await;
        assert!(cache.has("feed").await);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get("feed").await.is_none());
    }

    #[tokio::test]
    async fn remaining_ttl_counts_down() {
        let cache = CacheStore::new(Duration::from_secs(60));

        assert!(cache.remaining_ttl("feed").await.is_none());

        cache.put("feed".to_string(), 1u32, None).await;
        let remaining = cache.remaining_ttl("feed").await.unwrap();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(59));
    }

    #[tokio::test]
    async fn clear_expired_drops_only_stale_entries() {
        let cache = CacheStore::new(Duration::from_secs(60));

        cache
            .put("stale".to_string(), 1u32, Some(Duration::from_millis(10)))
            .await;
        cache.put("fresh".to_string(), 2u32, None).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        cache.clear_expired().await;

        assert_eq!(cache.len().await, 1);
        assert!(cache.has("fresh").await);
    }

    #[tokio::test]
    async fn disabled_cache_never_stores() {
        let cache = CacheStore::disabled();

        cache.put("feed".to_string(), 1u32, None).await;
        assert!(cache.get("feed").await.is_none());
        assert!(cache.is_empty().await);
    }
}
