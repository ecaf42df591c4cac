use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

const MAX_CACHED_PAGES: u64 = 1_024;

/// Rendered index pages keyed by the raw `page` query value.
///
/// Entries only expire by TTL; writes do not invalidate them.
#[derive(Clone)]
pub struct PageCache {
    inner: Option<Cache<String, String>>,
}

impl PageCache {
    /// A zero TTL disables caching.
    pub fn new(ttl: Duration) -> Self {
        let inner = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(MAX_CACHED_PAGES)
                .time_to_live(ttl)
                .build()
        });
        Self { inner }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let cache = self.inner.as_ref()?;
        let hit = cache.get(key).await;
        if hit.is_some() {
            debug!(key, "page cache hit");
        }
        hit
    }

    pub async fn insert(&self, key: String, body: String) {
        if let Some(cache) = &self.inner {
            cache.insert(key, body).await;
        }
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }
}
