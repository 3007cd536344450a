//! Key/value persistence seam.
//!
//! Models the host's local storage area: string keys, string values,
//! asynchronous access, and change notifications.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreError;

/// Change listener: receives the changed key and its new value (`None` when
/// the key was removed).
pub type StorageListener = Arc<dyn Fn(&str, Option<&str>) + Send + Sync>;

/// Core trait for storage backends.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the raw value for a key.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Fully replace the value for a key.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. No-op when absent.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Register a change listener; returns a token for [`unsubscribe`].
    ///
    /// [`unsubscribe`]: StorageBackend::unsubscribe
    fn subscribe(&self, listener: StorageListener) -> u64;

    /// Remove a previously registered listener.
    fn unsubscribe(&self, token: u64);
}
