//! Conversation scope keys.
//!
//! A scope key isolates one conversation's snippet stack from another. It is
//! derived from the page's host plus a conversation identity: the site
//! capability's extracted conversation id when one resolves, otherwise the
//! URL path as a route fallback. Keys are recomputed on demand and never
//! cached by the store.

use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;
use url::Url;

use clipstack_protocols::{LocationProvider, SiteCapability};

use crate::registry::SiteRegistry;

/// Versioned prefix for persisted stack records.
pub const STORAGE_KEY_PREFIX: &str = "clipstack.v1.";

/// Characters escaped in storage keys, beyond controls.
const KEY_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b'/')
    .add(b'\\')
    .add(b'#')
    .add(b'?');

/// Identifier isolating one conversation's stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Derive a key from a page URL and an optional matched site capability.
    pub fn derive(url: &str, capability: Option<&dyn SiteCapability>) -> Self {
        let Ok(parsed) = Url::parse(url) else {
            debug!("Unparseable page URL, using opaque scope: {}", url);
            return Self(format!("unknown::{}", url));
        };

        let host = parsed.host_str().unwrap_or("unknown").to_string();
        let conversation = capability
            .and_then(|cap| cap.conversation_id(&parsed))
            // Route fallback when no conversation id is resolvable.
            .unwrap_or_else(|| parsed.path().to_string());

        Self(format!("{}::{}", host, conversation))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The persisted record key: versioned prefix plus the percent-encoded
    /// scope identifier.
    pub fn storage_key(&self) -> String {
        format!(
            "{}{}",
            STORAGE_KEY_PREFIX,
            utf8_percent_encode(&self.0, KEY_ESCAPES)
        )
    }
}

/// Recomputes the active scope key from current page signals.
pub trait ScopeResolver: Send + Sync {
    fn current_scope(&self) -> ScopeKey;
}

/// [`ScopeResolver`] backed by the live page location and the site registry.
pub struct LocationScopeResolver {
    location: Arc<dyn LocationProvider>,
    sites: Arc<SiteRegistry>,
}

impl LocationScopeResolver {
    pub fn new(location: Arc<dyn LocationProvider>, sites: Arc<SiteRegistry>) -> Self {
        Self { location, sites }
    }
}

impl ScopeResolver for LocationScopeResolver {
    fn current_scope(&self) -> ScopeKey {
        let url = self.location.current_url();
        let capability = self.sites.match_url(&url);
        ScopeKey::derive(&url, capability.as_deref())
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
