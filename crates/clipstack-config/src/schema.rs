//! Configuration schema.

use serde::{Deserialize, Serialize};

use clipstack_protocols::StorageLimits;

use crate::error::ConfigError;

/// Process-wide Clipstack configuration.
///
/// Every field has a default; a missing or empty config document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipstackConfig {
    /// Stack size limits.
    pub limits: StorageLimits,

    /// Minimum trimmed snippet length accepted by `add`.
    pub min_snippet_chars: usize,

    /// Maximum trimmed snippet length accepted by `add`.
    pub max_snippet_chars: usize,

    /// How long a send transaction stays armed waiting for a matching
    /// network request before self-expiring.
    pub send_ttl_ms: u64,

    /// Delay between a DOM-path editor splice and clearing the stack, long
    /// enough for the platform to read the updated editor value.
    pub dom_clear_delay_ms: u64,

    /// Scope watcher polling interval.
    pub scope_poll_interval_ms: u64,
}

impl Default for ClipstackConfig {
    fn default() -> Self {
        Self {
            limits: StorageLimits::default(),
            min_snippet_chars: 3,
            max_snippet_chars: 10_000,
            send_ttl_ms: 10_000,
            dom_clear_delay_ms: 1_200,
            scope_poll_interval_ms: 1_000,
        }
    }
}

impl ClipstackConfig {
    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_snippets == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_snippets must be positive".to_string(),
            ));
        }
        if self.limits.max_total_chars == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_total_chars must be positive".to_string(),
            ));
        }
        if self.min_snippet_chars > self.max_snippet_chars {
            return Err(ConfigError::Invalid(format!(
                "min_snippet_chars ({}) exceeds max_snippet_chars ({})",
                self.min_snippet_chars, self.max_snippet_chars
            )));
        }
        if self.send_ttl_ms == 0 {
            return Err(ConfigError::Invalid(
                "send_ttl_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClipstackConfig::default();
        assert_eq!(config.limits.max_snippets, 75);
        assert_eq!(config.limits.max_total_chars, 30_000);
        assert_eq!(config.min_snippet_chars, 3);
        assert_eq!(config.max_snippet_chars, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = ClipstackConfig::default();
        config.limits.max_snippets = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_snippet_bounds() {
        let config = ClipstackConfig {
            min_snippet_chars: 20,
            max_snippet_chars: 10,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_snippet_chars"));
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let config = ClipstackConfig {
            send_ttl_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
