//! Durable key-value storage backing settings and the cooking-session slot.
//!
//! The store is deliberately dumb: string keys, JSON text values, no
//! transactions, no schema. Callers own serialization.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

/// Storage key for the persisted [`crate::settings::AppSettings`] blob.
pub const SETTINGS_KEY: &str = "@app_settings";
/// Storage key for the single cooking-session slot.
pub const COOKING_SESSION_KEY: &str = "@cooking_session";

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed store: one JSON file per key inside a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys like "@app_settings" map onto plain file names.
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        tokio::fs::write(&path, value)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", path.display()))
            }
        }
    }
}

/// In-memory store used by tests and previews. `fail_writes` simulates a
/// device whose storage rejects writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.lock().unwrap() = fail;
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            bail!("storage write rejected");
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            bail!("storage write rejected");
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
