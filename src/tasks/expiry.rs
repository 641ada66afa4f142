//! Entry Expiry Task
//!
//! One-shot background task that removes a single memoized entry once its TTL elapses.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::cache::{CacheKey, MemoStore};

/// Store shared between a memoized wrapper and its expiry tasks.
pub type SharedStore<V> = Arc<Mutex<MemoStore<V>>>;

/// Spawns a task that expires the entry stored under `key` with `generation` after `delay`.
///
/// The task only holds a weak reference, so a dropped store is never kept alive by its
/// timers. If the key has been re-populated in the meantime the fresher entry is kept.
///
/// # Arguments
/// * `handle` - Runtime the task is spawned on
/// * `store` - Store the entry lives in
/// * `key` - Key of the entry
/// * `generation` - Generation returned when the entry was inserted
/// * `delay` - Time until removal
pub fn spawn_expiry_task<V>(
    handle: &Handle,
    store: Weak<Mutex<MemoStore<V>>>,
    key: CacheKey,
    generation: u64,
    delay: Duration,
) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    handle.spawn(async move {
        tokio::time::sleep(delay).await;

        let Some(store) = store.upgrade() else {
            trace!(%key, "Store dropped before expiry");
            return;
        };

        let removed = store.lock().expire(&key, generation);
        if removed {
            debug!(%key, generation, "Expired memoized entry");
        } else {
            trace!(%key, generation, "Entry already replaced, expiry skipped");
        }
    })
}

// == Expiry Scheduler ==
/// Arms expiry timers for one memoized wrapper.
#[derive(Debug, Clone, Default)]
pub struct ExpiryScheduler {
    /// Runtime that was current when the wrapper was built
    fallback: Option<Handle>,
}

impl ExpiryScheduler {
    /// Creates a scheduler, remembering the current runtime if there is one.
    pub fn new() -> Self {
        Self {
            fallback: Handle::try_current().ok(),
        }
    }

    /// Schedules removal of one inserted entry.
    ///
    /// Prefers the runtime current at call time. Without any runtime no task is spawned
    /// and the entry is expired lazily on its next lookup.
    pub fn schedule<V>(
        &self,
        store: &SharedStore<V>,
        key: CacheKey,
        generation: u64,
        delay: Duration,
    ) -> Option<JoinHandle<()>>
    where
        V: Clone + Send + 'static,
    {
        let handle = Handle::try_current().ok().or_else(|| self.fallback.clone());

        match handle {
            Some(handle) => Some(spawn_expiry_task(
                &handle,
                Arc::downgrade(store),
                key,
                generation,
                delay,
            )),
            None => {
                warn!(%key, "No tokio runtime available, entry will expire on lookup");
                None
            }
        }
    }
}
