//! Cache Module
//!
//! Key-value cache with fixed TTL expiry and prefix-based bulk deletion,
//! behind the [`CacheBackend`] seam. Two backends: an in-process store and
//! Redis.

mod entry;
mod key;
mod memory;
mod redis;
mod store;


use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use key::query_key;
pub use memory::MemoryCache;
pub use redis::RedisCache;
pub use store::CacheStore;

// == Public Constants ==
/// TTL applied to populated entries unless configured otherwise (1 hour)
pub const DEFAULT_TTL_SECS: u64 = 3600;

// == Cache Backend ==
/// Contract the cache-aside layer consumes.
///
/// Every call returns a `Result`. Callers propagate failures instead of
/// treating them as misses.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the value for `key`, or `None` on miss or expiry.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key` for `ttl_seconds`, overwriting unconditionally.
    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;

    /// Deletes every key starting with `prefix` and returns how many went.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize>;
}
