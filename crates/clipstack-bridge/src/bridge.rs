//! The page-context bridge.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use clipstack_engine::compile::contains_marker;
use clipstack_protocols::{
    BridgeEnvelope, BridgeMessage, Direction, FetchResponse, OutboundRequest, PageFetch,
};

use crate::matcher::RequestMatcher;
use crate::splice::{default_strategies, PayloadSplice};

/// The armed compiled context waiting for a matching request.
struct PendingContext {
    tx_id: u64,
    context: String,
    expiry: CancellationToken,
}

/// Page-context half of the send pipeline.
///
/// Holds a single pending-context slot mirroring the coordinator's
/// `Pending` state, intercepts outgoing prompt-submission requests, and
/// reports outcomes back to the isolated context as tagged envelopes.
/// Everything here must fail soft: an internal error lets the original
/// request proceed unmodified, never breaking the host page.
pub struct PageBridge {
    slot: Mutex<Option<PendingContext>>,
    ttl: Duration,
    matcher: RequestMatcher,
    strategies: Vec<Box<dyn PayloadSplice>>,
    to_content: mpsc::UnboundedSender<Value>,
    shutdown: CancellationToken,
}

impl PageBridge {
    /// Create a bridge with the default splice strategies. Returns the
    /// receiver carrying envelopes addressed to the isolated context.
    pub fn new(ttl: Duration, matcher: RequestMatcher) -> (Arc<Self>, mpsc::UnboundedReceiver<Value>) {
        Self::with_strategies(ttl, matcher, default_strategies())
    }

    pub fn with_strategies(
        ttl: Duration,
        matcher: RequestMatcher,
        strategies: Vec<Box<dyn PayloadSplice>>,
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<Value>) {
        let (to_content, receiver) = mpsc::unbounded_channel();
        let bridge = Arc::new(Self {
            slot: Mutex::new(None),
            ttl,
            matcher,
            strategies,
            to_content,
            shutdown: CancellationToken::new(),
        });
        (bridge, receiver)
    }

    /// Transaction id currently armed, if any.
    pub fn pending_tx(&self) -> Option<u64> {
        self.slot.lock().as_ref().map(|p| p.tx_id)
    }

    /// Handle an envelope arriving from the isolated context. Messages
    /// failing tag validation are dropped.
    pub fn handle_message(self: &Arc<Self>, value: &Value) {
        let message = match BridgeEnvelope::decode(value, Direction::ToPage) {
            Ok(message) => message,
            Err(e) => {
                debug!("Dropping bridge message: {}", e);
                return;
            }
        };

        match message {
            BridgeMessage::SetContext { tx_id, context } => self.arm(tx_id, context),
            BridgeMessage::ClearContext { tx_id } => self.clear(tx_id),
            other => {
                debug!("Ignoring page-bound message kind: {:?}", other);
            }
        }
    }

    /// Intercept one outgoing call: splice the pending context into a
    /// matching payload, forward the (possibly modified) request to the
    /// page's own network layer, and report the call's completion for a
    /// claimed transaction.
    pub async fn around_fetch(
        &self,
        request: OutboundRequest,
        fetch: &dyn PageFetch,
    ) -> Result<FetchResponse, clipstack_protocols::error::BridgeError> {
        let (request, claimed) = self.prepare(request);
        let result = fetch.send(request).await;
        if let Some(tx_id) = claimed {
            let ok = result.as_ref().map(FetchResponse::ok).unwrap_or(false);
            self.emit(BridgeMessage::PromptRequestFinished { tx_id, ok });
        }
        result
    }

    /// Drop any armed context and stop background expiry.
    pub fn teardown(&self) {
        self.shutdown.cancel();
        if let Some(pending) = self.slot.lock().take() {
            pending.expiry.cancel();
        }
    }

    fn arm(self: &Arc<Self>, tx_id: u64, context: String) {
        let expiry = self.shutdown.child_token();
        {
            let mut slot = self.slot.lock();
            if let Some(previous) = slot.take() {
                previous.expiry.cancel();
            }
            *slot = Some(PendingContext {
                tx_id,
                context,
                expiry: expiry.clone(),
            });
        }
        debug!("Pending context armed for tx {}", tx_id);

        let bridge = self.clone();
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(ttl) => bridge.expire(tx_id),
                _ = expiry.cancelled() => {}
            }
        });
    }

    fn clear(&self, tx_id: u64) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|p| p.tx_id == tx_id) {
            if let Some(pending) = slot.take() {
                pending.expiry.cancel();
            }
            debug!("Pending context cleared for tx {}", tx_id);
        }
    }

    fn expire(&self, tx_id: u64) {
        let expired = {
            let mut slot = self.slot.lock();
            if slot.as_ref().is_some_and(|p| p.tx_id == tx_id) {
                slot.take()
            } else {
                None
            }
        };
        if expired.is_some() {
            warn!("Pending context expired unclaimed for tx {}", tx_id);
            self.emit(BridgeMessage::ContextExpired { tx_id });
        }
    }

    fn prepare(&self, mut request: OutboundRequest) -> (OutboundRequest, Option<u64>) {
        if !self.matcher.matches(&request) {
            return (request, None);
        }
        let pending = self
            .slot
            .lock()
            .as_ref()
            .map(|p| (p.tx_id, p.context.clone()));
        let Some((tx_id, context)) = pending else {
            return (request, None);
        };

        let Some(body) = request.body.as_deref() else {
            self.report_injection(tx_id, false, None);
            return (request, None);
        };
        if contains_marker(body) {
            debug!("Payload already carries the context marker; not re-stamping");
            return (request, None);
        }

        let mut payload: Value = match serde_json::from_str(body) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Unparseable submission payload: {}", e);
                self.report_injection(tx_id, false, None);
                return (request, None);
            }
        };

        let mode = self
            .strategies
            .iter()
            .find_map(|s| s.try_splice(&mut payload, &context));

        match mode {
            Some(mode) => match serde_json::to_string(&payload) {
                Ok(new_body) => {
                    request.body = Some(new_body);
                    self.claim(tx_id);
                    self.report_injection(tx_id, true, Some(mode));
                    (request, Some(tx_id))
                }
                Err(e) => {
                    debug!("Failed to re-serialize spliced payload: {}", e);
                    self.report_injection(tx_id, false, None);
                    (request, None)
                }
            },
            None => {
                self.report_injection(tx_id, false, None);
                (request, None)
            }
        }
    }

    fn claim(&self, tx_id: u64) {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|p| p.tx_id == tx_id) {
            if let Some(pending) = slot.take() {
                pending.expiry.cancel();
            }
        }
    }

    fn report_injection(&self, tx_id: u64, ok: bool, mode: Option<clipstack_protocols::InjectionMode>) {
        self.emit(BridgeMessage::ContextInjected { tx_id, ok, mode });
    }

    fn emit(&self, message: BridgeMessage) {
        let envelope = BridgeEnvelope::new(Direction::ToContent, message);
        if self.to_content.send(envelope.to_value()).is_err() {
            debug!("Isolated context receiver gone; dropping report");
        }
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
