//! # Clipstack Bridge
//!
//! The page-context half of the injection pipeline. Runs inside the host
//! page's own execution context (modeled here behind trait seams) so it can
//! intercept the page's outgoing network calls, splice the pending compiled
//! context into matching prompt-submission payloads exactly once, and report
//! outcomes back across the context boundary.
//!
//! ## Components
//!
//! - [`PageBridge`] - pending-context slot, interception, outcome reporting
//! - [`RequestMatcher`] - "does this look like a prompt submission" check
//! - [`splice`] - ordered payload-shape strategies

mod bridge;
mod matcher;
pub mod splice;

pub use bridge::PageBridge;
pub use matcher::RequestMatcher;
pub use splice::{default_strategies, PayloadSplice};
