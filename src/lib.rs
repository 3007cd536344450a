//! # Clipstack
//!
//! Conversation-scoped context collection for chat UIs: select text
//! anywhere, stack it per conversation, and have the compiled block ride
//! along with the next prompt, spliced into the outgoing request or the
//! editor itself.
//!
//! This facade re-exports the pieces a host embeds and wires the builtin
//! site profiles into a ready registry:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use clipstack::{ClipstackRuntime, register::default_registry};
//! use clipstack::adapters::{default_storage_backend, load_default_config};
//! use clipstack_protocols::{LocationProvider, SystemClock};
//!
//! struct PageLocation;
//! impl LocationProvider for PageLocation {
//!     fn current_url(&self) -> String {
//!         "https://chatgpt.com/c/0a1b2c3d-4e5f-6071-8293-a4b5c6d7e8f9".to_string()
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = ClipstackRuntime::new(
//!     load_default_config()?,
//!     default_registry(),
//!     Arc::new(PageLocation),
//!     default_storage_backend().await?,
//!     Arc::new(SystemClock),
//! );
//! runtime.capture_selection("the selected paragraph").await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod register;

pub use clipstack_bridge::{PageBridge, RequestMatcher};
pub use clipstack_config::{ClipstackConfig, ConfigLoader};
pub use clipstack_core::{ScopeKey, SiteRegistry};
pub use clipstack_engine::{CONTEXT_MARKER, ContextStack, compile, search};
pub use clipstack_inject::InjectionChain;
pub use clipstack_protocols::{
    BridgeEnvelope, BridgeMessage, ContextStackState, Direction, InjectionMode, InterceptMode,
    Snippet, StorageLimits,
};
pub use clipstack_runtime::{ClipstackRuntime, ScopeWatcher, SendCoordinator};
pub use clipstack_sites_builtin::SiteProfile;
pub use clipstack_store::{FileStorageBackend, MemoryStorageBackend, ScopedStore};
