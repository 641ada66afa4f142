//! Cache Entry Module
//!
//! Defines the structure for individual memoized results with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored result together with its identity and expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Identity of this insertion; expiry timers only remove the entry they were armed for
    pub generation: u64,
    /// When the value was stored
    pub created_at: Instant,
    /// When the value stops being served, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    pub fn new(value: V, generation: u64, ttl: Option<Duration>) -> Self {
        let now = Instant::now();

        Self {
            value,
            generation,
            created_at: now,
            expires_at: ttl.map(|ttl| now + ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}
