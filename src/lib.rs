//! Memo Cache - function-result memoization with timed expiry
//!
//! Wraps a computation, stores its results under a key derived from the call arguments,
//! and serves them until an optional time-to-live elapses.

pub mod cache;
pub mod config;
pub mod error;
pub mod memoize;
pub mod tasks;

pub use cache::{resolve_key, CacheKey, CacheStats, KeyResolver};
pub use config::MemoConfig;
pub use error::{MemoError, Result};
pub use memoize::{memoize, Memoized};
