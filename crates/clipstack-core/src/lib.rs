//! # Clipstack Core
//!
//! Conversation scope keys and the site-capability registry.
//!
//! ## Components
//!
//! - [`scope`] - Scope-key derivation and storage-key encoding
//! - [`registry`] - Site-capability registry

pub mod registry;
pub mod scope;

pub use registry::SiteRegistry;
pub use scope::{LocationScopeResolver, ScopeKey, ScopeResolver, STORAGE_KEY_PREFIX};
