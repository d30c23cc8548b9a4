//! Store adapters backing the hub.
//!
//! The hub only ever talks to a [`StoreAdapter`]; storage values are
//! strings, like the browser storage the protocol was designed around.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Errors from a store adapter.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Abstract keyed storage.
pub trait StoreAdapter {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deleting an absent key succeeds.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl StoreAdapter for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Store cached in memory and persisted to a JSON file.
///
/// Every mutation rewrites the file. A mutation whose write fails is
/// rolled back in memory.
pub struct FileStore {
    path: PathBuf,
    items: HashMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`, loading existing items from disk.
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        let items = load_items(&path)?;
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current items to disk.
    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.items)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        debug!("persisted {} item(s) to {:?}", self.items.len(), self.path);
        Ok(())
    }

    fn restore(&mut self, key: &str, previous: Option<String>) {
        match previous {
            Some(v) => self.items.insert(key.to_string(), v),
            None => self.items.remove(key),
        };
    }
}

impl StoreAdapter for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self.items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist() {
            self.restore(key, previous);
            return Err(e);
        }
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let Some(previous) = self.items.remove(key) else {
            return Ok(());
        };
        if let Err(e) = self.persist() {
            self.restore(key, Some(previous));
            return Err(e);
        }
        Ok(())
    }
}

/// Loads items from a JSON file. Returns an empty map if the file doesn't exist.
fn load_items(path: &Path) -> Result<HashMap<String, String>, StoreError> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let data = std::fs::read_to_string(path)?;
    let items: HashMap<String, String> = serde_json::from_str(&data)?;
    debug!("loaded {} item(s) from {:?}", items.len(), path);
    Ok(items)
}
