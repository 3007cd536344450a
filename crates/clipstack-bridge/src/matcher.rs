//! Prompt-submission request matching.

use regex::Regex;

use clipstack_protocols::OutboundRequest;

/// Decides whether an outgoing call looks like a prompt submission: the
/// method must be a write operation and the URL must match one of the
/// site's message-submission endpoint patterns.
pub struct RequestMatcher {
    patterns: Vec<Regex>,
}

impl RequestMatcher {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Patterns covering the builtin chat UIs' submission endpoints.
    pub fn default_endpoints() -> Self {
        let sources = [
            r"/backend-api/.*conversation",
            r"/api/organizations/.*/chat_conversations",
            r"/api/(chat|conversation|append_message)",
            r":(generateContent|streamGenerateContent)\b",
            r"/v1/(chat/completions|messages|responses)",
        ];
        Self::new(
            sources
                .iter()
                .filter_map(|s| Regex::new(s).ok())
                .collect(),
        )
    }

    pub fn matches(&self, request: &OutboundRequest) -> bool {
        request.is_write() && self.patterns.iter().any(|p| p.is_match(&request.url))
    }
}
