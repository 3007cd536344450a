//! Stack mutation operations.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use clipstack_config::ClipstackConfig;
use clipstack_protocols::error::StackError;
use clipstack_protocols::{Clock, ContextStackState, Snippet};
use clipstack_store::ScopedStore;

use crate::compile;

/// The context stack engine.
///
/// Every mutating operation reads the full current state from the scoped
/// store, computes a candidate next state, and writes it back before
/// returning; the write replaces the state wholesale (last-write-wins).
/// Two operations racing within the same turn both read the same prior
/// state and the later write wins — accepted at user-driven cadence, not
/// guarded by a lock.
pub struct ContextStack {
    store: Arc<ScopedStore>,
    config: Arc<ClipstackConfig>,
    clock: Arc<dyn Clock>,
}

impl ContextStack {
    pub fn new(store: Arc<ScopedStore>, config: Arc<ClipstackConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    pub fn store(&self) -> &Arc<ScopedStore> {
        &self.store
    }

    /// Current state of the active scope.
    pub async fn state(&self) -> Result<ContextStackState, StackError> {
        Ok(self.store.read().await?)
    }

    /// Validate, append, and persist a new snippet.
    ///
    /// Rejections (`TooShort`, `TooLarge`, `Duplicate`, `CharLimitExceeded`)
    /// leave the persisted state untouched. When the stack is full the
    /// oldest snippets are evicted to make room before the char budget is
    /// checked.
    pub async fn add(&self, text: &str, source_url: &str) -> Result<ContextStackState, StackError> {
        let normalized = text.trim();
        let char_count = normalized.chars().count();

        if char_count < self.config.min_snippet_chars {
            return Err(StackError::TooShort {
                min: self.config.min_snippet_chars,
            });
        }
        if char_count > self.config.max_snippet_chars {
            return Err(StackError::TooLarge {
                max: self.config.max_snippet_chars,
            });
        }

        let prior = self.store.read().await?;
        if prior.snippets.iter().any(|s| s.text == normalized) {
            return Err(StackError::Duplicate);
        }

        let now = self.clock.now();
        let mut snippets = prior.snippets;
        snippets.push(Snippet::new(normalized, source_url, now));

        // Keep only the newest max_snippets entries.
        let max = self.config.limits.max_snippets;
        if snippets.len() > max {
            let drop = snippets.len() - max;
            snippets.drain(..drop);
        }

        let candidate = ContextStackState::from_snippets(snippets, now);
        if candidate.total_chars > self.config.limits.max_total_chars {
            // Candidate discarded whole; prior state stays persisted.
            return Err(StackError::CharLimitExceeded {
                max: self.config.limits.max_total_chars,
            });
        }

        self.store.write(&candidate).await?;
        debug!(
            "Added snippet ({} chars); stack now {} snippet(s), {} chars",
            char_count,
            candidate.len(),
            candidate.total_chars
        );
        Ok(candidate)
    }

    /// Remove a snippet by id. An absent id leaves the persisted state
    /// untouched, `updated_at` included.
    pub async fn remove(&self, id: Uuid) -> Result<ContextStackState, StackError> {
        let prior = self.store.read().await?;
        if !prior.snippets.iter().any(|s| s.id == id) {
            return Ok(prior);
        }
        let mut snippets = prior.snippets;
        snippets.retain(|s| s.id != id);
        let next = ContextStackState::from_snippets(snippets, self.clock.now());
        self.store.write(&next).await?;
        Ok(next)
    }

    /// Replace a snippet's text (and with it char count and timestamp).
    /// An absent id leaves the persisted state untouched, `updated_at`
    /// included.
    pub async fn update(&self, id: Uuid, new_text: &str) -> Result<ContextStackState, StackError> {
        let normalized = new_text.trim();
        let now = self.clock.now();

        let prior = self.store.read().await?;
        if !prior.snippets.iter().any(|s| s.id == id) {
            return Ok(prior);
        }
        let mut snippets = prior.snippets;
        if let Some(snippet) = snippets.iter_mut().find(|s| s.id == id) {
            snippet.set_text(normalized, now);
        }
        let next = ContextStackState::from_snippets(snippets, now);
        self.store.write(&next).await?;
        Ok(next)
    }

    /// Move one snippet from `from_index` to `to_index` via
    /// extract-then-reinsert. No-op when `from_index` is out of range;
    /// `to_index` is clamped to the sequence end.
    pub async fn reorder(
        &self,
        from_index: usize,
        to_index: usize,
    ) -> Result<ContextStackState, StackError> {
        let prior = self.store.read().await?;
        if from_index >= prior.snippets.len() {
            return Ok(prior);
        }

        let mut snippets = prior.snippets;
        let snippet = snippets.remove(from_index);
        let target = to_index.min(snippets.len());
        snippets.insert(target, snippet);

        let next = ContextStackState::from_snippets(snippets, self.clock.now());
        self.store.write(&next).await?;
        Ok(next)
    }

    /// Replace the active scope's state with empty. Idempotent.
    pub async fn clear(&self) -> Result<ContextStackState, StackError> {
        let next = ContextStackState::empty(self.clock.now());
        self.store.write(&next).await?;
        debug!("Stack cleared for scope {}", self.store.current_scope().as_str());
        Ok(next)
    }

    /// Compile the current stack into the context block.
    pub async fn compile_current(&self) -> Result<String, StackError> {
        let state = self.store.read().await?;
        Ok(compile::compile(&state.snippets))
    }
}

#[cfg(test)]
#[path = "stack_tests.rs"]
mod tests;
