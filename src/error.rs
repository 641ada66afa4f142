//! Error types for memoized calls
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Memo Error Enum ==
/// Unified error type for key resolution and memoized calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// No arguments were supplied to derive a key from
    #[error("{0}")]
    InvalidArguments(String),

    /// The wrapped computation or the key resolver failed
    #[error("{0}")]
    Computation(String),

    /// The first argument could not be canonicalized into a key
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),
}

impl MemoError {
    /// Wraps a failure raised by user code, keeping only its message.
    pub(crate) fn computation(err: anyhow::Error) -> Self {
        MemoError::Computation(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for memoized calls.
pub type Result<T> = std::result::Result<T, MemoError>;
