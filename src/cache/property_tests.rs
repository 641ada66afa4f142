//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key derivation and store behaviour over generated inputs.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::{resolve_key, CacheKey, KeyResolver, MemoStore};
use crate::error::MemoError;
use crate::memoize::memoize;

// == Strategies ==
/// Generates short string keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,16}"
}

fn word_list_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,8}", 0..5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every distinct first argument is computed exactly once, however often it repeats.
    #[test]
    fn prop_one_computation_per_distinct_key(keys in prop::collection::vec(key_strategy(), 1..60)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let memoized = memoize(
            move |args: &[String]| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(args[0].len())
            },
            None,
            None,
        );

        for key in &keys {
            prop_assert_eq!(memoized.call(&[key.clone()]).unwrap(), key.len());
        }

        let distinct: HashSet<&String> = keys.iter().collect();
        prop_assert_eq!(calls.load(Ordering::SeqCst), distinct.len());
        prop_assert_eq!(memoized.len(), distinct.len());

        let stats = memoized.stats();
        prop_assert_eq!(stats.misses as usize, distinct.len());
        prop_assert_eq!(stats.hits as usize, keys.len() - distinct.len());
    }

    // Calls with the same resolver output hit even when the remaining arguments differ.
    #[test]
    fn prop_resolver_output_decides_hits(first in any::<i64>(), rest_a in any::<i64>(), rest_b in any::<i64>()) {
        let memoized = memoize(
            |args: &[i64]| Ok(args.to_vec()),
            Some(KeyResolver::new(|args: &[i64]| Ok(CacheKey::from(args[0])))),
            None,
        );

        let original = memoized.call(&[first, rest_a]).unwrap();
        prop_assert_eq!(memoized.call(&[first, rest_b]).unwrap(), original);
        prop_assert_eq!(memoized.stats().hits, 1);
    }

    // Composite keys collide exactly when the composites are structurally equal.
    #[test]
    fn prop_composite_keys_follow_structure(a in word_list_strategy(), b in word_list_strategy()) {
        let key_a = resolve_key(None, &[a.clone()]).unwrap();
        let key_b = resolve_key(None, &[b.clone()]).unwrap();
        prop_assert_eq!(key_a == key_b, a == b);
    }

    // Primitive kinds never collide with each other.
    #[test]
    fn prop_numbers_and_strings_stay_apart(n in any::<i64>()) {
        let number = resolve_key(None, &[serde_json::json!(n)]).unwrap();
        let string = resolve_key(None, &[serde_json::json!(n.to_string())]).unwrap();
        prop_assert_ne!(number, string);
    }

    // A failing computation never leaves an entry behind.
    #[test]
    fn prop_failures_do_not_poison(keys in prop::collection::vec(any::<u8>(), 1..30)) {
        let memoized = memoize(
            |args: &[u8]| {
                if args[0] % 2 == 0 {
                    anyhow::bail!("even input {}", args[0]);
                }
                Ok(args[0])
            },
            None,
            None,
        );

        for key in &keys {
            match memoized.call(&[*key]) {
                Ok(value) => prop_assert_eq!(value, *key),
                Err(err) => {
                    prop_assert_eq!(err, MemoError::Computation(format!("even input {}", key)));
                    prop_assert!(!memoized.contains_key(&CacheKey::from(*key)));
                }
            }
        }

        let odd: HashSet<u8> = keys.iter().copied().filter(|k| k % 2 == 1).collect();
        prop_assert_eq!(memoized.len(), odd.len());
    }

    // Expiring a generation only ever removes that generation.
    #[test]
    fn prop_expiry_is_identity_scoped(key in key_strategy(), reinserts in 1usize..6) {
        let mut store = MemoStore::new();
        let key = CacheKey::from(key);
        let mut generations = Vec::new();

        for value in 0..reinserts {
            store.clear();
            match store.insert(key.clone(), value, None) {
                crate::cache::Insertion::Inserted { generation, .. } => generations.push(generation),
                crate::cache::Insertion::Existing(_) => prop_assert!(false, "store was cleared"),
            }
        }

        let latest = *generations.last().unwrap();
        for stale in &generations[..generations.len() - 1] {
            prop_assert!(!store.expire(&key, *stale));
        }
        prop_assert_eq!(store.lookup(&key), Some(reinserts - 1));
        prop_assert!(store.expire(&key, latest));
        prop_assert!(store.is_empty());
    }
}
