//! # Clipstack Store
//!
//! Scope-keyed persistence: a [`ScopedStore`] that reads and writes the
//! active conversation's stack state over a pluggable [`StorageBackend`].
//!
//! Backends: [`MemoryStorageBackend`] for tests and ephemeral hosting,
//! [`FileStorageBackend`] for native profiles (one JSON file per key).
//!
//! [`StorageBackend`]: clipstack_protocols::StorageBackend

mod backend;
mod scoped;

pub use backend::{FileStorageBackend, MemoryStorageBackend};
pub use scoped::{ScopedStore, StateListener, StoreSubscription};
