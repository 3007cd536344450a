//! # Clipstack Inject
//!
//! The injection strategy chain: given an editor surface and a text payload,
//! apply the first applicable DOM-insertion technique and fire the input
//! notifications the host page's framework needs to observe the change.

mod chain;
mod strategies;

pub use chain::InjectionChain;
pub use strategies::{InsertStrategy, PlainTextSplice, RichTextExecCommand, RichTextRangeSplice};
