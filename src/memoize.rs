//! Memoizing Wrapper
//!
//! Wraps a computation so repeated calls with the same derived key are answered from a
//! private store until the configured timeout elapses.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{resolve_key, CacheKey, CacheStats, Insertion, KeyResolver, MemoStore};
use crate::config::MemoConfig;
use crate::error::{MemoError, Result};
use crate::tasks::{ExpiryScheduler, SharedStore};

type Computation<A, V> = Arc<dyn Fn(&[A]) -> anyhow::Result<V> + Send + Sync>;

/// Wraps `computation` in a [`Memoized`] with its own store.
///
/// `resolver` derives the cache key from the full argument list; without one the first
/// argument is the key. `timeout_ms` of `None` or `0` keeps entries for the lifetime of
/// the wrapper.
///
/// # Example
/// ```
/// use memo_cache::{memoize, CacheKey, KeyResolver};
///
/// let add = memoize(
///     |args: &[i64]| Ok(args.iter().sum::<i64>()),
///     Some(KeyResolver::new(|args: &[i64]| {
///         Ok(CacheKey::from(format!("{:?}", args)))
///     })),
///     None,
/// );
///
/// assert_eq!(add.call(&[1, 11, 26]).unwrap(), 38);
/// assert_eq!(add.call(&[1, 11, 26]).unwrap(), 38);
/// assert_eq!(add.stats().hits, 1);
/// ```
pub fn memoize<A, V, F>(
    computation: F,
    resolver: Option<KeyResolver<A>>,
    timeout_ms: Option<u64>,
) -> Memoized<A, V>
where
    A: Serialize,
    V: Clone + Send + 'static,
    F: Fn(&[A]) -> anyhow::Result<V> + Send + Sync + 'static,
{
    let config = MemoConfig::default().with_timeout_ms(timeout_ms.unwrap_or(0));
    Memoized::with_config(computation, resolver, config)
}

// == Memoized ==
/// A computation paired with the store of its results.
///
/// Clones share the same store.
pub struct Memoized<A, V> {
    computation: Computation<A, V>,
    resolver: Option<KeyResolver<A>>,
    store: SharedStore<V>,
    scheduler: ExpiryScheduler,
    config: Arc<MemoConfig>,
}

impl<A, V> Memoized<A, V>
where
    A: Serialize,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a wrapper with explicit configuration.
    pub fn with_config<F>(computation: F, resolver: Option<KeyResolver<A>>, config: MemoConfig) -> Self
    where
        F: Fn(&[A]) -> anyhow::Result<V> + Send + Sync + 'static,
    {
        Self {
            computation: Arc::new(computation),
            resolver,
            store: Arc::new(Mutex::new(MemoStore::new())),
            scheduler: ExpiryScheduler::new(),
            config: Arc::new(config),
        }
    }

    // == Call ==
    /// Returns the result for `args`, computing and storing it on a miss.
    ///
    /// Hits return the stored value without invoking the computation and without
    /// extending its lifetime. Failures leave the store untouched.
    ///
    /// # Errors
    /// - [`MemoError::InvalidArguments`] if `args` is empty
    /// - [`MemoError::Computation`] if the resolver or the computation fails
    /// - [`MemoError::InvalidKey`] if the first argument cannot be used as a key
    pub fn call(&self, args: &[A]) -> Result<V> {
        let key = resolve_key(self.resolver.as_ref(), args).map_err(|err| {
            if matches!(err, MemoError::Computation(_)) {
                warn!(name = %self.config.name, error = %err, "Key resolver failed");
                self.store.lock().record_failure();
            }
            err
        })?;

        if let Some(value) = self.store.lock().lookup(&key) {
            debug!(name = %self.config.name, %key, "Memoized hit");
            return Ok(value);
        }

        debug!(name = %self.config.name, %key, "Memoized miss, computing");

        // The lock is released here so the computation may re-enter this wrapper.
        let value = match (self.computation)(args) {
            Ok(value) => value,
            Err(err) => {
                warn!(name = %self.config.name, %key, error = %err, "Memoized computation failed");
                self.store.lock().record_failure();
                return Err(MemoError::computation(err));
            }
        };

        let ttl = self.config.timeout();
        let insertion = self.store.lock().insert(key.clone(), value, ttl);

        if let (Insertion::Inserted { generation, .. }, Some(ttl)) = (&insertion, ttl) {
            self.scheduler.schedule(&self.store, key, *generation, ttl);
        }

        Ok(insertion.into_value())
    }

    /// Returns true if a live entry exists for `key`.
    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.store.lock().contains_key(key)
    }

    /// Drops every stored result.
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Entry lifetime, None if entries never expire.
    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout()
    }
}

// Manual Clone so A and V need not be Clone themselves
impl<A, V> Clone for Memoized<A, V> {
    fn clone(&self) -> Self {
        Self {
            computation: Arc::clone(&self.computation),
            resolver: self.resolver.clone(),
            store: Arc::clone(&self.store),
            scheduler: self.scheduler.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<A, V> fmt::Debug for Memoized<A, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("name", &self.config.name)
            .field("timeout_ms", &self.config.timeout_ms)
            .field("has_resolver", &self.resolver.is_some())
            .finish_non_exhaustive()
    }
}
