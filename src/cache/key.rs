//! Cache Key Module
//!
//! Derives a single cache key from the arguments of one memoized call.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::{MemoError, Result};

/// Message reported when a call supplies no arguments.
pub const NO_ARGUMENTS_MESSAGE: &str = "Unable to create cache keys without function arguments";

// == Cache Key ==
/// Identifier an entry is stored under.
///
/// Primitive kinds are kept apart, so the number `1` and the string `"1"` are different
/// keys. Arrays and objects become [`CacheKey::Composite`] holding their compact JSON text
/// with object keys sorted, which makes structurally equal composites the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Null,
    Bool(bool),
    /// Canonical decimal text of the number
    Number(String),
    Str(String),
    /// Canonical JSON of an array or object
    Composite(String),
}

impl CacheKey {
    // == Canonicalize ==
    /// Canonicalizes a serialized argument into a key.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => CacheKey::Null,
            Value::Bool(b) => CacheKey::Bool(b),
            Value::Number(n) => CacheKey::Number(n.to_string()),
            Value::String(s) => CacheKey::Str(s),
            composite @ (Value::Array(_) | Value::Object(_)) => {
                CacheKey::Composite(composite.to_string())
            }
        }
    }

    /// Serializes `arg` and canonicalizes the result.
    pub fn from_serialize<A: Serialize + ?Sized>(arg: &A) -> Result<Self> {
        serde_json::to_value(arg)
            .map(Self::from_value)
            .map_err(|e| MemoError::InvalidKey(e.to_string()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Null => f.write_str("null"),
            CacheKey::Bool(b) => write!(f, "{}", b),
            CacheKey::Number(n) => f.write_str(n),
            CacheKey::Str(s) => write!(f, "{:?}", s),
            CacheKey::Composite(json) => f.write_str(json),
        }
    }
}

impl From<bool> for CacheKey {
    fn from(b: bool) -> Self {
        CacheKey::Bool(b)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        CacheKey::Str(s.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        CacheKey::Str(s)
    }
}

impl From<f64> for CacheKey {
    fn from(n: f64) -> Self {
        // Non-finite floats have no JSON form; serde_json maps them to null.
        CacheKey::from_value(Value::from(n))
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CacheKey {
                fn from(n: $ty) -> Self {
                    CacheKey::Number(n.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// == Key Resolver ==
/// Maps the full argument list of a call to a cache key.
pub struct KeyResolver<A> {
    resolve: Arc<dyn Fn(&[A]) -> anyhow::Result<CacheKey> + Send + Sync>,
}

impl<A> KeyResolver<A> {
    pub fn new<F>(resolve: F) -> Self
    where
        F: Fn(&[A]) -> anyhow::Result<CacheKey> + Send + Sync + 'static,
    {
        Self {
            resolve: Arc::new(resolve),
        }
    }

    fn resolve(&self, args: &[A]) -> anyhow::Result<CacheKey> {
        (self.resolve)(args)
    }
}

impl<A> Clone for KeyResolver<A> {
    fn clone(&self) -> Self {
        Self {
            resolve: Arc::clone(&self.resolve),
        }
    }
}

impl<A> fmt::Debug for KeyResolver<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyResolver").finish_non_exhaustive()
    }
}

// == Resolve Key ==
/// Derives the cache key for one call.
///
/// With a resolver the key is whatever it returns for the full argument list. Without one
/// the first argument is canonicalized (see [`CacheKey`]).
///
/// # Errors
/// - [`MemoError::InvalidArguments`] if `args` is empty
/// - [`MemoError::Computation`] if the resolver fails
/// - [`MemoError::InvalidKey`] if the first argument cannot be serialized
pub fn resolve_key<A: Serialize>(resolver: Option<&KeyResolver<A>>, args: &[A]) -> Result<CacheKey> {
    let first = args
        .first()
        .ok_or_else(|| MemoError::InvalidArguments(NO_ARGUMENTS_MESSAGE.to_string()))?;

    match resolver {
        Some(resolver) => resolver.resolve(args).map_err(MemoError::computation),
        None => CacheKey::from_serialize(first),
    }
}
