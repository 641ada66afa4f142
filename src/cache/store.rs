//! Cache Store Module
//!
//! Key-to-result storage for one memoized wrapper, with TTL expiration scoped to the
//! identity of each stored entry.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheKey, CacheStats};

// == Insertion ==
/// Outcome of [`MemoStore::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<V> {
    /// The value was stored as a new entry with this generation
    Inserted { value: V, generation: u64 },
    /// A live entry already existed and was kept; carries its value
    Existing(V),
}

impl<V> Insertion<V> {
    pub fn into_value(self) -> V {
        match self {
            Insertion::Inserted { value, .. } | Insertion::Existing(value) => value,
        }
    }
}

// == Memo Store ==
/// Results of one memoized computation, keyed by derived cache key.
#[derive(Debug)]
pub struct MemoStore<V> {
    /// Key-value storage
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// Generation handed to the next inserted entry
    next_generation: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl<V: Clone> MemoStore<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_generation: 1,
            stats: CacheStats::new(),
        }
    }

    // == Lookup ==
    /// Returns the stored value for `key` if a live entry exists.
    ///
    /// Presence is decided by key membership, so zero, empty or `None` values are hits.
    /// An entry past its expiry is removed and counted as a miss. Lookups never extend
    /// an entry's lifetime.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<V> {
        if self.remove_if_expired(key) {
            self.stats.record_miss();
            return None;
        }

        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores a freshly computed value unless a live entry for `key` already exists.
    ///
    /// An existing live entry wins, keeping at most one entry per key; its value is
    /// returned instead.
    pub fn insert(&mut self, key: CacheKey, value: V, ttl: Option<Duration>) -> Insertion<V> {
        self.remove_if_expired(&key);

        if let Some(existing) = self.entries.get(&key) {
            return Insertion::Existing(existing.value.clone());
        }

        let generation = self.next_generation;
        self.next_generation += 1;

        self.entries
            .insert(key, CacheEntry::new(value.clone(), generation, ttl));
        self.stats.set_total_entries(self.entries.len());

        Insertion::Inserted { value, generation }
    }

    // == Expire ==
    /// Removes `key` if its entry is still the one stored under `generation`.
    ///
    /// Returns true if an entry was removed.
    pub fn expire(&mut self, key: &CacheKey, generation: u64) -> bool {
        match self.entries.get(key) {
            Some(entry) if entry.generation == generation => {
                self.entries.remove(key);
                self.stats.record_expiration();
                self.stats.set_total_entries(self.entries.len());
                true
            }
            _ => false,
        }
    }

    fn remove_if_expired(&mut self, key: &CacheKey) -> bool {
        let generation = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => entry.generation,
            _ => return false,
        };
        self.expire(key, generation)
    }

    /// Returns true if a live entry exists for `key`.
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Records a failed resolver or computation.
    pub fn record_failure(&mut self) {
        self.stats.record_failure();
    }

    /// Removes every entry. Pending expiry timers find no matching generation afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone> Default for MemoStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
