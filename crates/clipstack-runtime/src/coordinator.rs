//! Send-transaction coordinator.
//!
//! Owns the Idle/Pending lifecycle of a send: compiling the stack into a
//! context block, arming the page bridge, waiting out the TTL, and clearing
//! the stack exactly once when the transaction settles.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use clipstack_config::ClipstackConfig;
use clipstack_engine::{ContextStack, compile, contains_marker};
use clipstack_inject::InjectionChain;
use clipstack_protocols::error::StackError;
use clipstack_protocols::{
    BridgeEnvelope, BridgeMessage, CaretRange, Clock, Direction, EditorSurface,
};

/// A send that has been armed but not yet settled.
struct PendingSend {
    tx_id: u64,
    expires_at: DateTime<Utc>,
    /// Cancels the TTL timer when the transaction settles early.
    timer: CancellationToken,
}

/// Coordinates the network-path send flow between the stack and the page
/// bridge.
///
/// At most one transaction is pending at a time. A second send intent while
/// one is pending reuses the live transaction instead of re-arming, so the
/// page side never holds two competing contexts.
pub struct SendCoordinator {
    stack: Arc<ContextStack>,
    chain: InjectionChain,
    clock: Arc<dyn Clock>,
    pending: Mutex<Option<PendingSend>>,
    next_tx: AtomicU64,
    send_ttl: Duration,
    dom_clear_delay: Duration,
    to_page: mpsc::UnboundedSender<Value>,
    shutdown: CancellationToken,
}

impl SendCoordinator {
    /// Build a coordinator and the channel of envelopes it emits toward the
    /// page context.
    pub fn new(
        stack: Arc<ContextStack>,
        clock: Arc<dyn Clock>,
        config: &ClipstackConfig,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<Value>) {
        let (to_page, rx) = mpsc::unbounded_channel();
        let coordinator = Arc::new(Self {
            stack,
            chain: InjectionChain::new(),
            clock,
            pending: Mutex::new(None),
            next_tx: AtomicU64::new(1),
            send_ttl: Duration::from_millis(config.send_ttl_ms),
            dom_clear_delay: Duration::from_millis(config.dom_clear_delay_ms),
            to_page,
            shutdown: CancellationToken::new(),
        });
        (coordinator, rx)
    }

    /// The id of the pending transaction, if one is live.
    pub fn pending_tx(&self) -> Option<u64> {
        self.pending.lock().as_ref().map(|p| p.tx_id)
    }

    /// When the pending transaction self-expires, if one is live.
    pub fn pending_expiry(&self) -> Option<DateTime<Utc>> {
        self.pending.lock().as_ref().map(|p| p.expires_at)
    }

    /// Begin the network-path send flow.
    ///
    /// Compiles the current stack and arms the page bridge with it under a
    /// fresh transaction id. Returns `None` without arming when the stack is
    /// empty. If a transaction is already pending its id is returned
    /// unchanged.
    pub async fn begin_send(self: &Arc<Self>) -> Result<Option<u64>, StackError> {
        if let Some(tx_id) = self.pending_tx() {
            debug!("Send intent while tx {} pending, reusing it", tx_id);
            return Ok(Some(tx_id));
        }

        let state = self.stack.state().await?;
        if state.snippets.is_empty() {
            return Ok(None);
        }
        let context = compile(&state.snippets);

        let timer = self.shutdown.child_token();
        let expires_at = self.clock.now()
            + chrono::Duration::from_std(self.send_ttl).unwrap_or(chrono::Duration::zero());

        // The slot holds at most one transaction. The tx id is allocated and
        // the slot written under a single lock acquisition: a second intent
        // that armed while the state was being read is reused, not replaced.
        let tx_id = {
            let mut pending = self.pending.lock();
            if let Some(p) = pending.as_ref() {
                debug!("Send intent while tx {} pending, reusing it", p.tx_id);
                return Ok(Some(p.tx_id));
            }
            let tx_id = self.next_tx.fetch_add(1, Ordering::Relaxed);
            *pending = Some(PendingSend {
                tx_id,
                expires_at,
                timer: timer.clone(),
            });
            tx_id
        };

        self.emit(BridgeMessage::SetContext { tx_id, context });
        debug!(
            "Armed send tx {} ({} snippets, {} chars)",
            tx_id, state.snippets.len(), state.total_chars
        );

        let coordinator = Arc::clone(self);
        let ttl = self.send_ttl;
        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => {}
                _ = tokio::time::sleep(ttl) => coordinator.expire(tx_id).await,
            }
        });

        Ok(Some(tx_id))
    }

    /// Handle an envelope arriving from the page context.
    ///
    /// Settlement rules: a successful splice report or a finished network
    /// call for the pending transaction settles it and clears the stack; an
    /// expiry report settles it and clears the stack; a failed splice report
    /// leaves the transaction armed for a later matching request. Messages
    /// for any other transaction id are ignored.
    pub async fn handle_page_message(self: &Arc<Self>, value: &Value) {
        let message = match BridgeEnvelope::decode(value, Direction::ToContent) {
            Ok(message) => message,
            Err(e) => {
                debug!("Dropping page message: {}", e);
                return;
            }
        };

        let Some(pending_tx) = self.pending_tx() else {
            debug!("Page message with no pending send: {:?}", message);
            return;
        };
        if message.tx_id() != pending_tx {
            debug!(
                "Ignoring page message for tx {} while tx {} is pending",
                message.tx_id(),
                pending_tx
            );
            return;
        }

        match message {
            BridgeMessage::ContextInjected { ok: true, mode, .. } => {
                debug!("Context spliced for tx {} via {:?}", pending_tx, mode);
                self.settle(pending_tx).await;
            }
            BridgeMessage::ContextInjected { ok: false, .. } => {
                debug!("Splice failed for tx {}, staying armed", pending_tx);
            }
            BridgeMessage::PromptRequestFinished { ok, .. } => {
                debug!("Prompt request for tx {} finished (ok={})", pending_tx, ok);
                self.settle(pending_tx).await;
            }
            BridgeMessage::ContextExpired { .. } => {
                debug!("Page slot for tx {} expired", pending_tx);
                self.settle(pending_tx).await;
            }
            BridgeMessage::SetContext { .. } | BridgeMessage::ClearContext { .. } => {
                debug!("Unexpected page-bound message kind from page context");
            }
        }
    }

    /// DOM-path send: splice the compiled context straight into the editor.
    ///
    /// Used on pages intercepted at the DOM level rather than the network
    /// level. Returns whether a splice happened; the stack is cleared after
    /// a short delay so the page framework can observe the updated value
    /// first.
    pub async fn send_via_editor(
        self: &Arc<Self>,
        editor: &mut dyn EditorSurface,
    ) -> Result<bool, StackError> {
        let state = self.stack.state().await?;
        if state.snippets.is_empty() {
            return Ok(false);
        }
        if contains_marker(&editor.value()) {
            debug!("Editor already carries a compiled context, skipping splice");
            return Ok(false);
        }

        let context = compile(&state.snippets);
        editor.set_caret(CaretRange::collapsed(0));
        if !self.chain.insert(Some(editor), &context) {
            warn!("No injection strategy applied to the editor surface");
            return Ok(false);
        }

        let coordinator = Arc::clone(self);
        let delay = self.dom_clear_delay;
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Err(e) = coordinator.stack.clear().await {
                        warn!("Failed to clear stack after editor splice: {}", e);
                    }
                }
            }
        });
        Ok(true)
    }

    /// Cancel all timers and drop any pending transaction.
    pub fn teardown(&self) {
        self.shutdown.cancel();
        *self.pending.lock() = None;
    }

    /// Settle the pending transaction: stop its timer, go idle, clear the
    /// stack.
    async fn settle(&self, tx_id: u64) {
        {
            let mut pending = self.pending.lock();
            match pending.take() {
                Some(p) if p.tx_id == tx_id => p.timer.cancel(),
                other => {
                    *pending = other;
                    return;
                }
            }
        }
        if let Err(e) = self.stack.clear().await {
            warn!("Failed to clear stack settling tx {}: {}", tx_id, e);
        }
    }

    /// TTL elapsed without settlement: disarm the page side and settle.
    async fn expire(&self, tx_id: u64) {
        let expired = {
            let mut pending = self.pending.lock();
            match pending.take() {
                Some(p) if p.tx_id == tx_id => true,
                other => {
                    *pending = other;
                    false
                }
            }
        };
        if !expired {
            return;
        }

        warn!("Send tx {} expired before any matching request", tx_id);
        self.emit(BridgeMessage::ClearContext { tx_id });
        if let Err(e) = self.stack.clear().await {
            warn!("Failed to clear stack expiring tx {}: {}", tx_id, e);
        }
    }

    fn emit(&self, message: BridgeMessage) {
        let envelope = BridgeEnvelope::new(Direction::ToPage, message);
        if self.to_page.send(envelope.to_value()).is_err() {
            debug!("Page-bound channel closed, dropping envelope");
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
