//! Compiled context format.
//!
//! The output is a byte-stable contract consumed by the host page's model:
//! fixed header, `[Snippet N]` blocks in stack order separated by blank
//! lines, fixed footer. The first header line doubles as the
//! de-duplication marker checked before any injection.

use std::fmt::Write;

use clipstack_protocols::Snippet;

/// First line of every compiled block; its presence anywhere in a field
/// means the context has already been injected there.
pub const CONTEXT_MARKER: &str = "### SELECTED CONTEXT (User-Collected)";

const HEADER_REST: &str = "IMPORTANT: Do not let this context influence anything outside this specific message/prompt request.\nThe following snippets were highlighted from earlier conversation:\n";

const FOOTER: &str = "User Question:\n";

/// Compile snippets into the context block, preserving input order.
pub fn compile(snippets: &[Snippet]) -> String {
    let mut out = String::new();
    out.push_str(CONTEXT_MARKER);
    out.push('\n');
    out.push_str(HEADER_REST);
    out.push('\n');

    for (index, snippet) in snippets.iter().enumerate() {
        // Numbering is 1-based in stack order.
        let _ = write!(out, "[Snippet {}]\n{}\n\n", index + 1, snippet.text);
    }

    out.push_str(FOOTER);
    out
}

/// Whether `text` already carries a compiled context block.
pub fn contains_marker(text: &str) -> bool {
    text.contains(CONTEXT_MARKER)
}
