//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A serialized value and the instant it stops being readable.
///
/// The TTL is fixed at write time. Reads never extend it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored serialized value
    pub value: String,
    /// Expiration instant
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    pub fn new(value: String, ttl_seconds: u64) -> Self {
        Self {
            value,
            expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: once the current instant reaches the expiration
    /// instant the entry is expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}
