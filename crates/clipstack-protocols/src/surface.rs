//! Editor and document seams.
//!
//! The engine never touches a real DOM; hosts implement these traits over
//! whatever document they control. Tests use in-memory fakes.

/// What kind of editing surface a message input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    /// A content-editable rich-text surface.
    RichText,
    /// A plain form input or textarea.
    PlainText,
}

/// Caret position inside an editor, as character offsets into its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretRange {
    pub start: usize,
    pub end: usize,
}

impl CaretRange {
    pub fn collapsed(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// A page's message-input element, abstracted.
///
/// `exec_insert_text` models an editing-command insertion (may be
/// unsupported; returns `false`); `splice_at_caret` models a manual range
/// splice into rich-text content. Plain-text surfaces are driven through
/// `value`/`set_value`/`set_caret` instead.
pub trait EditorSurface {
    fn kind(&self) -> EditorKind;

    /// Full textual content of the surface.
    fn value(&self) -> String;

    /// Replace the full textual content.
    fn set_value(&mut self, value: &str);

    /// Current caret, if the surface exposes one.
    fn caret(&self) -> Option<CaretRange>;

    fn set_caret(&mut self, range: CaretRange);

    /// Editing-command-based insertion at the caret. `false` when the host
    /// does not support the command.
    fn exec_insert_text(&mut self, text: &str) -> bool;

    /// Manual text-node splice at the caret (or end of content without one),
    /// collapsing the selection after the inserted text.
    fn splice_at_caret(&mut self, text: &str) -> bool;

    /// Dispatch input-changed and change notifications so the page's own
    /// reactive framework observes the mutation.
    fn dispatch_input_events(&mut self);
}

/// Selector-based document lookup, the engine's window into the host page.
pub trait DocumentQuery {
    /// Resolve the first element matching `selector` as an editor surface.
    fn query_editor(&self, selector: &str) -> Option<Box<dyn EditorSurface>>;

    /// Whether any element matches `selector`.
    fn query_exists(&self, selector: &str) -> bool;
}
