//! Configuration Module
//!
//! Options for a single memoized wrapper. Values are plain data so hosts can embed them
//! in their own configuration files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default wrapper name used in log fields.
pub const DEFAULT_NAME: &str = "memoized";

/// Memoization wrapper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoConfig {
    /// Name reported in log fields
    pub name: String,
    /// Entry lifetime in milliseconds, 0 = entries never expire
    pub timeout_ms: u64,
}

impl MemoConfig {
    /// Creates a config with the default name and no expiry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the entry lifetime, or None if entries never expire.
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            timeout_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = MemoConfig::default();
        assert_eq!(config.name, "memoized");
        assert_eq!(config.timeout_ms, 0);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_config_builders() {
        let config = MemoConfig::new().with_name("prices").with_timeout_ms(5000);
        assert_eq!(config.name, "prices");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config: MemoConfig = serde_json::from_str(r#"{"timeout_ms": 250}"#).unwrap();
        assert_eq!(config.name, DEFAULT_NAME);
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));

        let config: MemoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MemoConfig::default());
    }
}
