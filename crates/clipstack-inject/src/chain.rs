//! The strategy chain.

use tracing::debug;

use clipstack_protocols::EditorSurface;

use crate::strategies::{
    InsertStrategy, PlainTextSplice, RichTextExecCommand, RichTextRangeSplice,
};

/// Applies insertion strategies in fixed priority order.
pub struct InjectionChain {
    strategies: Vec<Box<dyn InsertStrategy>>,
}

impl InjectionChain {
    /// The default chain: editing command, rich-text range splice, plain
    /// caret splice.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(RichTextExecCommand),
                Box::new(RichTextRangeSplice),
                Box::new(PlainTextSplice),
            ],
        }
    }

    /// A chain with a custom strategy order.
    pub fn with_strategies(strategies: Vec<Box<dyn InsertStrategy>>) -> Self {
        Self { strategies }
    }

    /// Insert `text` into the editor via the first applicable strategy.
    ///
    /// Returns `false` when no editor was found or no strategy succeeded.
    /// After any success the editor's input-changed and change notifications
    /// are dispatched; without them the host page's reactive framework never
    /// sees the mutation.
    pub fn insert(&self, editor: Option<&mut dyn EditorSurface>, text: &str) -> bool {
        let Some(editor) = editor else {
            return false;
        };

        for strategy in &self.strategies {
            if !strategy.applies(editor) {
                continue;
            }
            if strategy.insert(editor, text) {
                debug!("Inserted {} chars via '{}'", text.chars().count(), strategy.id());
                editor.dispatch_input_events();
                return true;
            }
        }

        debug!("No insertion strategy succeeded");
        false
    }
}

impl Default for InjectionChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
