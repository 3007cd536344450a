//! Data-driven site capability.

use regex::Regex;
use tracing::debug;
use url::Url;

use clipstack_protocols::{DocumentQuery, EditorSurface, InterceptMode, SiteCapability};

/// A [`SiteCapability`] described entirely by data: URL patterns, selector
/// lists, and an intercept mode. New chat UIs with conventional shapes need
/// a profile, not code.
pub struct SiteProfile {
    id: String,
    host_pattern: Regex,
    conversation_pattern: Option<Regex>,
    editor_selectors: Vec<String>,
    mount_selectors: Vec<String>,
    endpoint_patterns: Vec<Regex>,
    intercept_mode: InterceptMode,
}

impl SiteProfile {
    /// Start a profile. `host_pattern` is matched against the URL host.
    pub fn new(id: impl Into<String>, host_pattern: Regex, intercept_mode: InterceptMode) -> Self {
        Self {
            id: id.into(),
            host_pattern,
            conversation_pattern: None,
            editor_selectors: Vec::new(),
            mount_selectors: Vec::new(),
            endpoint_patterns: Vec::new(),
            intercept_mode,
        }
    }

    /// Pattern whose first capture group extracts the conversation id from
    /// the page URL path.
    pub fn conversation_pattern(mut self, pattern: Regex) -> Self {
        self.conversation_pattern = Some(pattern);
        self
    }

    /// Editor selectors, tried in order.
    pub fn editor_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.editor_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// UI mount point selectors, tried in order.
    pub fn mount_selectors<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mount_selectors = selectors.into_iter().map(Into::into).collect();
        self
    }

    /// Message-submission endpoint patterns.
    pub fn endpoint_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.endpoint_patterns = patterns;
        self
    }
}

impl SiteCapability for SiteProfile {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| self.host_pattern.is_match(host))
    }

    fn intercept_mode(&self) -> InterceptMode {
        self.intercept_mode
    }

    fn conversation_id(&self, url: &Url) -> Option<String> {
        let pattern = self.conversation_pattern.as_ref()?;
        let captures = pattern.captures(url.path())?;
        captures.get(1).map(|m| m.as_str().to_string())
    }

    fn is_submission_endpoint(&self, url: &str) -> bool {
        self.endpoint_patterns.iter().any(|p| p.is_match(url))
    }

    fn locate_editor(&self, doc: &dyn DocumentQuery) -> Option<Box<dyn EditorSurface>> {
        for selector in &self.editor_selectors {
            if let Some(editor) = doc.query_editor(selector) {
                return Some(editor);
            }
        }
        debug!("No editor selector matched for site {}", self.id);
        None
    }

    fn locate_mount_point(&self, doc: &dyn DocumentQuery) -> Option<String> {
        self.mount_selectors
            .iter()
            .find(|selector| doc.query_exists(selector))
            .cloned()
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
