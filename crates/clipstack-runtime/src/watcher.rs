//! Scope watcher.
//!
//! SPA hosts rewrite their URL without a page load, so the active
//! conversation can change under us at any time. The watcher polls the
//! resolver and emits the new scope key whenever it differs from the last
//! one observed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use clipstack_core::{ScopeKey, ScopeResolver};

/// Polls the scope resolver and reports scope changes.
pub struct ScopeWatcher;

impl ScopeWatcher {
    /// Start watching. The returned channel yields each new scope key once,
    /// starting from the first change after spawn. Dropping the receiver or
    /// cancelling `shutdown` stops the poll loop.
    pub fn spawn(
        resolver: Arc<dyn ScopeResolver>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> mpsc::UnboundedReceiver<ScopeKey> {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut last = resolver.current_scope();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick fires immediately and observes the spawn-time
            // scope again.
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        let current = resolver.current_scope();
                        if current != last {
                            debug!("Scope changed: {} -> {}", last.as_str(), current.as_str());
                            last = current.clone();
                            if tx.send(current).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        rx
    }
}
