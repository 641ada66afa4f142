//! Background Tasks Module
//!
//! Contains the timers that run alongside memoized wrappers.
//!
//! # Tasks
//! - Entry expiry: removes one stored result once its TTL elapses

mod expiry;

pub use expiry::{spawn_expiry_task, ExpiryScheduler, SharedStore};
