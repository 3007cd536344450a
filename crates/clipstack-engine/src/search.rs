//! In-memory snippet filtering.

use clipstack_protocols::Snippet;

/// Case-insensitive substring filter against snippet text or source URL.
/// An empty query returns the input unchanged. Pure; touches no storage.
pub fn search(snippets: &[Snippet], query: &str) -> Vec<Snippet> {
    if query.is_empty() {
        return snippets.to_vec();
    }
    let needle = query.to_lowercase();
    snippets
        .iter()
        .filter(|s| {
            s.text.to_lowercase().contains(&needle)
                || s.source_url.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
