use crate::models::Venue;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// In-memory cache for fetched listings
///
/// The listing is a static document, so one process-local tier with a TTL
/// is enough; each entry is shared between requests behind an `Arc`.
#[derive(Clone)]
pub struct ListingCache {
    cache: Cache<String, Arc<Vec<Venue>>>,
    ttl_secs: u64,
}

impl ListingCache {
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache, ttl_secs }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Vec<Venue>>> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            tracing::trace!("Cache hit: {}", key);
        } else {
            tracing::trace!("Cache miss: {}", key);
        }
        hit
    }

    pub async fn set(&self, key: &str, venues: Arc<Vec<Venue>>) {
        self.cache.insert(key.to_string(), venues).await;
        tracing::trace!("Cache set: {} (ttl {}s)", key, self.ttl_secs);
    }

    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a listing URL
    pub fn listing(url: &str) -> String {
        format!("listing:{}", url)
    }
}
