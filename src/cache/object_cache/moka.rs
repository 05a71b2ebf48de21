use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaObjectCache);

/// 带单条 TTL 的缓存值
#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

struct EntryExpiry;

impl Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _now: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _now: Instant,
        _current: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

pub struct MokaObjectCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MokaObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_limits(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_limits(max_capacity: u64, default_ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!(
            "MokaObjectCache initialized (capacity: {}, ttl: {}s)",
            max_capacity, default_ttl_secs
        );
        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, Entry { value, ttl }).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ObjectCacheExt;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaObjectCache::with_limits(100, 60);
        cache
            .insert_raw("k".to_string(), "v".to_string(), 0)
            .await;
        assert_eq!(cache.get_raw("k").await, CacheResult::Found("v".to_string()));

        cache.remove("k").await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let cache = MokaObjectCache::with_limits(100, 60);
        cache
            .insert_json("codes".to_string(), &vec!["AB123", "CD456"], 30)
            .await;

        let codes: Option<Vec<String>> = cache.get_json("codes").await.found();
        assert_eq!(codes, Some(vec!["AB123".to_string(), "CD456".to_string()]));
    }
}
