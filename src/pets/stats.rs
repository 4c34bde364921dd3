//! List Cache Statistics
//!
//! Tracks hits, misses and namespace invalidations on the pet list path.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Listing Stats ==
/// Lock-free counters shared by concurrent list reads.
#[derive(Debug, Default)]
pub struct ListingStats {
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

/// Point-in-time copy of [`ListingStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl ListingStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Hit ==
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Miss ==
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Invalidation ==
    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
