//! Storage backend implementations.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::fs;
use tracing::debug;

use clipstack_protocols::error::StoreError;
use clipstack_protocols::{StorageBackend, StorageListener};

/// Listener table shared by both backends.
#[derive(Default)]
struct Listeners {
    next_token: AtomicU64,
    entries: Mutex<HashMap<u64, StorageListener>>,
}

impl Listeners {
    fn add(&self, listener: StorageListener) -> u64 {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().insert(token, listener);
        token
    }

    fn remove(&self, token: u64) {
        self.entries.lock().remove(&token);
    }

    fn notify(&self, key: &str, value: Option<&str>) {
        let listeners: Vec<StorageListener> = self.entries.lock().values().cloned().collect();
        for listener in listeners {
            listener(key, value);
        }
    }
}

/// In-memory backend.
#[derive(Default)]
pub struct MemoryStorageBackend {
    values: Mutex<HashMap<String, String>>,
    listeners: Listeners,
}

impl MemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorageBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        self.listeners.notify(key, Some(value));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().remove(key);
        self.listeners.notify(key, None);
        Ok(())
    }

    fn subscribe(&self, listener: StorageListener) -> u64 {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, token: u64) {
        self.listeners.remove(token);
    }
}

/// File-backed storage: one file per key under a base directory.
pub struct FileStorageBackend {
    dir: PathBuf,
    listeners: Listeners,
}

impl FileStorageBackend {
    /// Create a backend rooted at `dir`, creating the directory if needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        debug!("FileStorageBackend initialized at {:?}", dir);
        Ok(Self {
            dir,
            listeners: Listeners::default(),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' || c == '%' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", sanitized))
    }
}

#[async_trait]
impl StorageBackend for FileStorageBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.path_for(key), value).await?;
        self.listeners.notify(key, Some(value));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.listeners.notify(key, None);
        Ok(())
    }

    fn subscribe(&self, listener: StorageListener) -> u64 {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, token: u64) {
        self.listeners.remove(token);
    }
}
