//! In-process cache backend

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheBackend, CacheStore};
use crate::error::Result;

/// [`CacheBackend`] over a locked [`CacheStore`].
///
/// Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the underlying store, used by the cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    /// Number of entries currently held.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        // Write lock: expired entries are evicted on read
        let mut store = self.store.write().await;
        Ok(store.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        let mut store = self.store.write().await;
        store.set(key.to_string(), value, ttl_seconds);
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize> {
        let mut store = self.store.write().await;
        Ok(store.delete_by_prefix(prefix))
    }
}
