//! Snippet type for collected text fragments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One collected text fragment.
///
/// Identity is carried by `id` and never changes; `text`, `char_count`, and
/// `timestamp` move together on edit. Snippets are owned by the store's
/// collection for the current scope; other components only ever see clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    /// Stable identity.
    pub id: Uuid,

    /// The captured text, already normalized (trimmed).
    pub text: String,

    /// URL of the page the text was captured from.
    pub source_url: String,

    /// Last time text was set (creation or edit).
    pub timestamp: DateTime<Utc>,

    /// Character count of `text`.
    pub char_count: usize,
}

impl Snippet {
    /// Create a snippet from already-normalized text.
    pub fn new(text: impl Into<String>, source_url: impl Into<String>, now: DateTime<Utc>) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Self {
            id: Uuid::new_v4(),
            text,
            source_url: source_url.into(),
            timestamp: now,
            char_count,
        }
    }

    /// Replace the text, updating `char_count` and `timestamp` with it.
    pub fn set_text(&mut self, text: impl Into<String>, now: DateTime<Utc>) {
        self.text = text.into();
        self.char_count = self.text.chars().count();
        self.timestamp = now;
    }
}
