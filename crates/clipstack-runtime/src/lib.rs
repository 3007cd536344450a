//! # Clipstack Runtime
//!
//! The send-transaction coordinator, the scope watcher, and the runtime
//! facade that wires a page's store, stack, and bridge channels together.
//!
//! ## Components
//!
//! - [`SendCoordinator`] - Idle/Pending send lifecycle over the page bridge
//! - [`ScopeWatcher`] - polling detector for SPA conversation changes
//! - [`ClipstackRuntime`] - per-page wiring facade

mod coordinator;
mod runtime;
mod watcher;

pub use coordinator::SendCoordinator;
pub use runtime::ClipstackRuntime;
pub use watcher::ScopeWatcher;
