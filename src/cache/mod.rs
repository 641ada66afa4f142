//! Cache Module
//!
//! Key derivation and per-wrapper result storage with TTL expiration.

mod entry;
mod key;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use key::{resolve_key, CacheKey, KeyResolver, NO_ARGUMENTS_MESSAGE};
pub use stats::CacheStats;
pub use store::{Insertion, MemoStore};
