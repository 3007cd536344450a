//! The scoped store.

use std::sync::Arc;

use tracing::{debug, warn};

use clipstack_core::{ScopeKey, ScopeResolver};
use clipstack_protocols::error::StoreError;
use clipstack_protocols::{Clock, ContextStackState, StorageBackend};

/// Callback receiving the active scope's next state after a change.
pub type StateListener = Arc<dyn Fn(ContextStackState) + Send + Sync>;

/// Persists one [`ContextStackState`] per scope key.
///
/// The scope key is recomputed from current page signals on every read and
/// write; the store caches nothing. Writes fully replace the persisted value
/// for the key. Change notifications fire only when the changed key matches
/// the scope key active at delivery time, so a write against a now-inactive
/// scope never reaches the subscriber.
pub struct ScopedStore {
    backend: Arc<dyn StorageBackend>,
    resolver: Arc<dyn ScopeResolver>,
    clock: Arc<dyn Clock>,
}

impl ScopedStore {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        resolver: Arc<dyn ScopeResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            resolver,
            clock,
        }
    }

    /// The scope key currently active for this page.
    pub fn current_scope(&self) -> ScopeKey {
        self.resolver.current_scope()
    }

    /// Read the active scope's state; empty default when nothing (or
    /// something unreadable) is persisted.
    pub async fn read(&self) -> Result<ContextStackState, StoreError> {
        let key = self.current_scope().storage_key();
        let raw = self.backend.get(&key).await?;
        Ok(self.parse_or_default(&key, raw.as_deref()))
    }

    /// Fully replace the active scope's persisted state.
    pub async fn write(&self, state: &ContextStackState) -> Result<(), StoreError> {
        let key = self.current_scope().storage_key();
        let raw = serde_json::to_string(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        debug!(
            "Persisting {} snippet(s) ({} chars) under {}",
            state.len(),
            state.total_chars,
            key
        );
        self.backend.set(&key, &raw).await
    }

    /// Subscribe to changes of the active scope's state. Dropping the
    /// returned guard unsubscribes.
    pub fn subscribe(&self, listener: StateListener) -> StoreSubscription {
        let resolver = self.resolver.clone();
        let clock = self.clock.clone();
        let token = self.backend.subscribe(Arc::new(move |key, value| {
            // Active scope is re-derived at delivery time: a write to a key
            // we have since navigated away from must not surface.
            let active = resolver.current_scope().storage_key();
            if key != active {
                return;
            }
            let state = match value {
                Some(raw) => match serde_json::from_str::<ContextStackState>(raw) {
                    Ok(state) => state,
                    Err(e) => {
                        warn!("Ignoring unreadable stack state under {}: {}", key, e);
                        return;
                    }
                },
                None => ContextStackState::empty(clock.now()),
            };
            listener(state);
        }));

        StoreSubscription {
            backend: self.backend.clone(),
            token,
        }
    }

    fn parse_or_default(&self, key: &str, raw: Option<&str>) -> ContextStackState {
        match raw {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable stack state under {}: {}", key, e);
                ContextStackState::empty(self.clock.now())
            }),
            None => ContextStackState::empty(self.clock.now()),
        }
    }
}

/// Subscription guard; unsubscribes from the backend on drop.
pub struct StoreSubscription {
    backend: Arc<dyn StorageBackend>,
    token: u64,
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        self.backend.unsubscribe(self.token);
    }
}

#[cfg(test)]
#[path = "scoped_tests.rs"]
mod tests;
