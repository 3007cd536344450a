//! Host-side defaults and wiring helpers.

use std::path::PathBuf;
use std::sync::Arc;

use clipstack_config::{ClipstackConfig, ConfigError, ConfigLoader};
use clipstack_protocols::error::StoreError;
use clipstack_store::FileStorageBackend;

/// The `.clipstack` directory.
pub fn clipstack_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".clipstack"))
        .unwrap_or_else(|| PathBuf::from(".clipstack"))
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    clipstack_dir().join("config.json")
}

/// Default directory for persisted per-conversation stacks.
pub fn default_storage_dir() -> PathBuf {
    clipstack_dir().join("stacks")
}

/// Load the configuration from its default path; a missing file yields the
/// defaults.
pub fn load_default_config() -> Result<ClipstackConfig, ConfigError> {
    let path = default_config_path();
    if path.exists() {
        ConfigLoader::load(&path)
    } else {
        Ok(ClipstackConfig::default())
    }
}

/// File backend rooted at the default storage directory.
pub async fn default_storage_backend() -> Result<Arc<FileStorageBackend>, StoreError> {
    Ok(Arc::new(FileStorageBackend::new(default_storage_dir()).await?))
}
