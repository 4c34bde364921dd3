//! Cache-aside layer for the pet list
//!
//! Reads derive a key from the filter shape and consult the cache before
//! persistence. Every mutation drops the whole `pets` namespace.
//!
//! Known staleness window: nothing orders a read's miss-then-populate against
//! a concurrent mutation's write-then-invalidate. A read that missed before
//! the invalidation can populate the cache with pre-mutation rows after it,
//! and that entry is served until the next mutation or TTL expiry. Concurrent
//! misses on one key each query persistence and the last write wins.

use std::sync::Arc;

use tracing::debug;

use super::stats::{ListingStats, StatsSnapshot};
use super::PETS_NAMESPACE;
use crate::cache::{query_key, CacheBackend};
use crate::error::Result;
use crate::models::{Pet, PetFilters};

/// Result of a cache lookup.
#[derive(Debug)]
pub enum Lookup {
    /// Cached rows, returned without touching persistence
    Hit(Vec<Pet>),
    /// Nothing cached; populate `key` after loading
    Miss { key: String },
}

/// Cache-aside policy over a [`CacheBackend`].
pub struct PetListCache {
    backend: Arc<dyn CacheBackend>,
    ttl_seconds: u64,
    stats: ListingStats,
}

impl PetListCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl_seconds: u64) -> Self {
        Self {
            backend,
            ttl_seconds,
            stats: ListingStats::new(),
        }
    }

    /// Looks up the cache entry for `filters`.
    ///
    /// Backend errors propagate; they are never downgraded to a miss.
    pub async fn lookup(&self, filters: &PetFilters) -> Result<Lookup> {
        let key = query_key(PETS_NAMESPACE, filters)?;

        match self.backend.get(&key).await? {
            Some(raw) => {
                let pets: Vec<Pet> = serde_json::from_str(&raw)?;
                self.stats.record_hit();
                debug!(key = %key, count = pets.len(), "pet list cache hit");
                Ok(Lookup::Hit(pets))
            }
            None => {
                self.stats.record_miss();
                debug!(key = %key, "pet list cache miss");
                Ok(Lookup::Miss { key })
            }
        }
    }

    /// Stores freshly loaded rows under `key` with the configured TTL.
    pub async fn populate(&self, key: &str, pets: &[Pet]) -> Result<()> {
        let raw = serde_json::to_string(pets)?;
        self.backend.set(key, raw, self.ttl_seconds).await
    }

    /// Drops every cached list variant.
    ///
    /// Returns how many entries were removed; zero on an empty namespace.
    pub async fn invalidate(&self) -> Result<usize> {
        let removed = self.backend.delete_by_prefix(PETS_NAMESPACE).await?;
        self.stats.record_invalidation();
        debug!(removed, "pet list cache invalidated");
        Ok(removed)
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    fn pet(id: i64, kind: &str) -> Pet {
        Pet {
            id,
            name: format!("pet-{}", id),
            kind: kind.to_string(),
            age: 3,
            breed: "Mixed".to_string(),
            images: Vec::new(),
        }
    }

    fn cats() -> PetFilters {
        PetFilters {
            kind: Some("Cat".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = PetListCache::new(Arc::new(MemoryCache::new()), 60);

        let key = match cache.lookup(&cats()).await.unwrap() {
            Lookup::Miss { key } => key,
            Lookup::Hit(_) => panic!("empty cache must miss"),
        };
        cache.populate(&key, &[pet(1, "Cat")]).await.unwrap();

        match cache.lookup(&cats()).await.unwrap() {
            Lookup::Hit(pets) => assert_eq!(pets, vec![pet(1, "Cat")]),
            Lookup::Miss { .. } => panic!("populated key must hit"),
        }

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_invalidate_drops_every_variant() {
        let backend = Arc::new(MemoryCache::new());
        let cache = PetListCache::new(backend.clone(), 60);

        for filters in [PetFilters::default(), cats()] {
            if let Lookup::Miss { key } = cache.lookup(&filters).await.unwrap() {
                cache.populate(&key, &[]).await.unwrap();
            }
        }
        assert_eq!(backend.len().await, 2);

        assert_eq!(cache.invalidate().await.unwrap(), 2);
        assert!(matches!(
            cache.lookup(&cats()).await.unwrap(),
            Lookup::Miss { .. }
        ));
    }

    #[tokio::test]
    async fn test_invalidate_twice_is_noop() {
        let cache = PetListCache::new(Arc::new(MemoryCache::new()), 60);

        assert_eq!(cache.invalidate().await.unwrap(), 0);
        assert_eq!(cache.invalidate().await.unwrap(), 0);
        assert_eq!(cache.stats().invalidations, 2);
    }

    #[tokio::test]
    async fn test_invalidate_leaves_other_namespaces() {
        let backend = Arc::new(MemoryCache::new());
        backend.set("users:1", "{}".to_string(), 60).await.unwrap();
        let cache = PetListCache::new(backend.clone(), 60);

        cache.invalidate().await.unwrap();

        assert!(backend.get("users:1").await.unwrap().is_some());
    }
}
