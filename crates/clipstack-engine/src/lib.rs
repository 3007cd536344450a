//! # Clipstack Engine
//!
//! The context stack engine: a bounded, conversation-scoped snippet
//! collection with strict invariants, plus deterministic compilation of the
//! collected snippets into the prompt-safe context block.
//!
//! ## Components
//!
//! - [`ContextStack`] - add/remove/update/reorder/clear over the scoped store
//! - [`compile`] - the byte-stable compiled context format and its marker
//! - [`search`] - pure in-memory snippet filtering

pub mod compile;
pub mod search;
mod stack;

pub use compile::{compile, contains_marker, CONTEXT_MARKER};
pub use search::search;
pub use stack::ContextStack;
