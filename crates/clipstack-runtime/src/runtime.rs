//! Runtime facade wiring the store, engine, coordinator, and watcher
//! together for a host page.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use clipstack_config::ClipstackConfig;
use clipstack_core::{LocationScopeResolver, ScopeKey, ScopeResolver, SiteRegistry};
use clipstack_engine::ContextStack;
use clipstack_protocols::error::StackError;
use clipstack_protocols::{
    Clock, ContextStackState, InterceptMode, LocationProvider, SiteCapability, StorageBackend,
};
use clipstack_store::ScopedStore;

use crate::coordinator::SendCoordinator;
use crate::watcher::ScopeWatcher;

/// One page's fully wired engine instance.
///
/// Hosts construct this with their own storage backend, location provider,
/// and site registry, then shuttle the two envelope channels across the
/// page/content boundary themselves.
pub struct ClipstackRuntime {
    config: Arc<ClipstackConfig>,
    sites: Arc<SiteRegistry>,
    location: Arc<dyn LocationProvider>,
    resolver: Arc<dyn ScopeResolver>,
    stack: Arc<ContextStack>,
    coordinator: Arc<SendCoordinator>,
    page_outbox: Mutex<Option<mpsc::UnboundedReceiver<Value>>>,
    shutdown: CancellationToken,
}

impl ClipstackRuntime {
    pub fn new(
        config: ClipstackConfig,
        sites: Arc<SiteRegistry>,
        location: Arc<dyn LocationProvider>,
        backend: Arc<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let config = Arc::new(config);
        let resolver: Arc<dyn ScopeResolver> = Arc::new(LocationScopeResolver::new(
            Arc::clone(&location),
            Arc::clone(&sites),
        ));
        let store = Arc::new(ScopedStore::new(
            backend,
            Arc::clone(&resolver),
            Arc::clone(&clock),
        ));
        let stack = Arc::new(ContextStack::new(store, Arc::clone(&config), Arc::clone(&clock)));
        let (coordinator, page_outbox) = SendCoordinator::new(Arc::clone(&stack), clock, &config);

        Self {
            config,
            sites,
            location,
            resolver,
            stack,
            coordinator,
            page_outbox: Mutex::new(Some(page_outbox)),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn stack(&self) -> &Arc<ContextStack> {
        &self.stack
    }

    pub fn coordinator(&self) -> &Arc<SendCoordinator> {
        &self.coordinator
    }

    pub fn config(&self) -> &ClipstackConfig {
        &self.config
    }

    /// Envelopes bound for the page context. The host forwards these across
    /// the boundary. Yields the channel once; `None` on later calls.
    pub fn take_page_outbox(&self) -> Option<mpsc::UnboundedReceiver<Value>> {
        self.page_outbox.lock().take()
    }

    /// Attach the channel of envelopes arriving from the page context and
    /// start dispatching them to the coordinator.
    pub fn attach_page_inbox(self: &Arc<Self>, mut inbox: mpsc::UnboundedReceiver<Value>) {
        let runtime = Arc::clone(self);
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    received = inbox.recv() => match received {
                        Some(value) => runtime.coordinator.handle_page_message(&value).await,
                        None => break,
                    },
                }
            }
            debug!("Page inbox pump stopped");
        });
    }

    /// Add selected page text to the active conversation's stack, sourcing
    /// it from the current URL.
    pub async fn capture_selection(&self, text: &str) -> Result<ContextStackState, StackError> {
        self.stack.add(text, &self.location.current_url()).await
    }

    /// The site capability matching the current page, if any.
    pub fn current_site(&self) -> Option<Arc<dyn SiteCapability>> {
        self.sites.match_url(&self.location.current_url())
    }

    /// How sends should be intercepted on the current page. `None` when no
    /// registered site matches.
    pub fn intercept_mode(&self) -> Option<InterceptMode> {
        self.current_site().map(|site| site.intercept_mode())
    }

    /// Start watching for conversation scope changes.
    pub fn watch_scope(&self) -> mpsc::UnboundedReceiver<ScopeKey> {
        ScopeWatcher::spawn(
            Arc::clone(&self.resolver),
            Duration::from_millis(self.config.scope_poll_interval_ms),
            self.shutdown.child_token(),
        )
    }

    /// Stop all background tasks. The persisted stacks are left untouched.
    pub fn teardown(&self) {
        self.coordinator.teardown();
        self.shutdown.cancel();
    }
}
