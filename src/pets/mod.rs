//! Pets Module
//!
//! Pet CRUD with a cache-aside list read path and namespace-wide
//! invalidation on every mutation.

mod listing;
mod service;
mod stats;

pub use listing::{Lookup, PetListCache};
pub use service::{CacheOutcome, Listing, PetService};
pub use stats::{ListingStats, StatsSnapshot};

/// Key prefix shared by every cached pet list
pub const PETS_NAMESPACE: &str = "pets";
