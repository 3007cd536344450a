//! Per-site capability interface.
//!
//! All call sites consult this interface through the site registry; nothing
//! outside a capability implementation branches on a site name. Change
//! observation for scope switching is handled by the runtime's scope watcher
//! rather than per-capability callbacks.

use url::Url;

use crate::surface::{DocumentQuery, EditorSurface};

/// How the compiled context reaches a site's outgoing prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptMode {
    /// The site submits via an asynchronous network call; the page-network
    /// bridge splices the context into the outgoing payload.
    Network,
    /// The site reads the editor content directly on send; the context is
    /// spliced into the editor just before the site's own send handler runs.
    Dom,
}

/// Capability resolved once per page via the site registry.
pub trait SiteCapability: Send + Sync {
    /// Stable registry id.
    fn id(&self) -> &str;

    /// Whether this capability handles the given page URL.
    fn matches(&self, url: &Url) -> bool;

    fn intercept_mode(&self) -> InterceptMode;

    /// Conversation identity extracted from the page URL, when resolvable.
    fn conversation_id(&self, url: &Url) -> Option<String>;

    /// Whether an outgoing request URL is a message-submission endpoint.
    fn is_submission_endpoint(&self, url: &str) -> bool;

    /// Resolve the page's message-input element.
    fn locate_editor(&self, doc: &dyn DocumentQuery) -> Option<Box<dyn EditorSurface>>;

    /// Resolve the selector of the UI mount point, if present on the page.
    fn locate_mount_point(&self, doc: &dyn DocumentQuery) -> Option<String>;
}

/// Seam for the host page's current location.
pub trait LocationProvider: Send + Sync {
    /// The page's current URL as a string.
    fn current_url(&self) -> String;
}
