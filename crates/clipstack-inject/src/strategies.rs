//! Individual insertion strategies.

use clipstack_protocols::{CaretRange, EditorKind, EditorSurface};

/// One DOM-insertion technique. Strategies are tried in fixed priority
/// order; the first whose `applies` and `insert` both succeed wins.
pub trait InsertStrategy: Send + Sync {
    fn id(&self) -> &str;

    fn applies(&self, editor: &dyn EditorSurface) -> bool;

    /// Attempt the insertion. Must leave the editor untouched on failure.
    fn insert(&self, editor: &mut dyn EditorSurface, text: &str) -> bool;
}

/// Editing-command insertion into a content-editable surface.
pub struct RichTextExecCommand;

impl InsertStrategy for RichTextExecCommand {
    fn id(&self) -> &str {
        "rich-text-exec-command"
    }

    fn applies(&self, editor: &dyn EditorSurface) -> bool {
        editor.kind() == EditorKind::RichText
    }

    fn insert(&self, editor: &mut dyn EditorSurface, text: &str) -> bool {
        editor.exec_insert_text(text)
    }
}

/// Manual range splice into a content-editable surface: insert a text node
/// at the caret (or at the end of content) and collapse the selection after
/// it. Fallback for hosts where the editing command fails.
pub struct RichTextRangeSplice;

impl InsertStrategy for RichTextRangeSplice {
    fn id(&self) -> &str {
        "rich-text-range-splice"
    }

    fn applies(&self, editor: &dyn EditorSurface) -> bool {
        editor.kind() == EditorKind::RichText
    }

    fn insert(&self, editor: &mut dyn EditorSurface, text: &str) -> bool {
        editor.splice_at_caret(text)
    }
}

/// Caret splice for plain inputs and textareas, driven entirely through the
/// surface's value and caret accessors.
pub struct PlainTextSplice;

impl InsertStrategy for PlainTextSplice {
    fn id(&self) -> &str {
        "plain-text-splice"
    }

    fn applies(&self, editor: &dyn EditorSurface) -> bool {
        editor.kind() == EditorKind::PlainText
    }

    fn insert(&self, editor: &mut dyn EditorSurface, text: &str) -> bool {
        let value = editor.value();
        let chars: Vec<char> = value.chars().collect();

        // Append at the end when the surface exposes no caret.
        let caret = editor
            .caret()
            .unwrap_or_else(|| CaretRange::collapsed(chars.len()));
        let start = caret.start.min(chars.len());
        let end = caret.end.min(chars.len()).max(start);

        let mut next: String = chars[..start].iter().collect();
        next.push_str(text);
        next.extend(&chars[end..]);

        editor.set_value(&next);
        // Caret lands just after the inserted text.
        let after = start + text.chars().count();
        editor.set_caret(CaretRange::collapsed(after));
        true
    }
}
