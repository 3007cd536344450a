//! Per-scope stack state and size limits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snippet::Snippet;

/// The persisted state of one conversation scope's snippet stack.
///
/// Order is meaningful: compiled output follows `snippets` order. The state
/// is replaced wholesale on every write; `total_chars` must equal the sum of
/// the snippets' `char_count` after any mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextStackState {
    pub snippets: Vec<Snippet>,
    pub total_chars: usize,
    pub updated_at: DateTime<Utc>,
}

impl ContextStackState {
    /// Empty state for a scope with nothing persisted.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            snippets: Vec::new(),
            total_chars: 0,
            updated_at: now,
        }
    }

    /// Build a state from snippets, recomputing `total_chars`.
    pub fn from_snippets(snippets: Vec<Snippet>, now: DateTime<Utc>) -> Self {
        let total_chars = snippets.iter().map(|s| s.char_count).sum();
        Self {
            snippets,
            total_chars,
            updated_at: now,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }
}

/// Process-wide stack size limits, constant for the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLimits {
    /// Maximum number of snippets kept; oldest are dropped first.
    #[serde(default = "default_max_snippets")]
    pub max_snippets: usize,

    /// Maximum combined character count across all snippets.
    #[serde(default = "default_max_total_chars")]
    pub max_total_chars: usize,
}

fn default_max_snippets() -> usize {
    75
}

fn default_max_total_chars() -> usize {
    30_000
}

impl Default for StorageLimits {
    fn default() -> Self {
        Self {
            max_snippets: default_max_snippets(),
            max_total_chars: default_max_total_chars(),
        }
    }
}
