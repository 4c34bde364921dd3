//! Cache Store Module
//!
//! In-process key-value map with fixed TTL expiry and prefix deletion.

use std::collections::HashMap;

use crate::cache::CacheEntry;

// == Cache Store ==
/// In-process cache storage.
///
/// Not synchronized on its own; [`crate::cache::MemoryCache`] wraps it in a
/// lock so that every set and delete is atomic with respect to other calls.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
}

impl CacheStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Stores a value under `key` for `ttl_seconds`.
    ///
    /// An existing entry is overwritten unconditionally and its TTL reset.
    pub fn set(&mut self, key: String, value: String, ttl_seconds: u64) {
        self.entries.insert(key, CacheEntry::new(value, ttl_seconds));
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// Expired entries are removed on the way out, so a read past the TTL is
    /// indistinguishable from a read of a key that was never written.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    // == Delete By Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed, which may be zero.
    pub fn delete_by_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included until
    /// they are swept or read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new();

        store.set("pets:{}".to_string(), "[]".to_string(), 3600);

        assert_eq!(store.get("pets:{}").as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite_resets_value() {
        let mut store = CacheStore::new();

        store.set("k".to_string(), "v1".to_string(), 3600);
        store.set("k".to_string(), "v2".to_string(), 3600);

        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new();

        store.set("pets:{}".to_string(), "[]".to_string(), 1);
        assert!(store.get("pets:{}").is_some());

        sleep(Duration::from_secs(2));

        assert!(store.get("pets:{}").is_none());
        // the expired read also evicts
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_read_does_not_extend_ttl() {
        let mut store = CacheStore::new();

        store.set("k".to_string(), "v".to_string(), 1);
        sleep(Duration::from_millis(600));
        assert!(store.get("k").is_some());
        sleep(Duration::from_millis(600));

        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_delete_by_prefix() {
        let mut store = CacheStore::new();

        store.set("pets:{}".to_string(), "[]".to_string(), 3600);
        store.set(r#"pets:{"type":"Cat"}"#.to_string(), "[]".to_string(), 3600);
        store.set("users:1".to_string(), "{}".to_string(), 3600);

        assert_eq!(store.delete_by_prefix("pets"), 2);
        assert_eq!(store.len(), 1);
        assert!(store.get("users:1").is_some());
    }

    #[test]
    fn test_delete_by_prefix_is_idempotent() {
        let mut store = CacheStore::new();

        store.set("pets:{}".to_string(), "[]".to_string(), 3600);

        assert_eq!(store.delete_by_prefix("pets"), 1);
        assert_eq!(store.delete_by_prefix("pets"), 0);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new();

        store.set("short".to_string(), "v".to_string(), 1);
        store.set("long".to_string(), "v".to_string(), 10);

        sleep(Duration::from_millis(1100));

        assert_eq!(store.cleanup_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("long").is_some());
    }
}
