// Storage module - persisted key/value entries that survive restarts
//
// This plays the role browser-local storage plays for a web client: a flat
// map of string keys to string values. The session layer keeps the access
// token and the serialized user record here.
//
// The file backend writes through on every mutation so the file is always the
// source of truth; the in-memory map is only a cache of it.
// Example: jq '.access_token' ~/.local/share/storefront/local_storage.json

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// A string key/value store with synchronous persistence
pub trait KeyValueStore: Send {
    /// Read a value, `None` if the key is absent
    fn get(&self, key: &str) -> Option<String>;

    /// Insert or overwrite a value and persist it
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value and persist the removal (no-op if absent)
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// JSON-file backed store
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed
    ///
    /// A missing file is an empty store. An unreadable or corrupt file is
    /// logged and treated as empty; the next write replaces it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create storage directory")?;
            }
        }

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("Discarding corrupt storage file {:?}: {}", path, e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        tracing::debug!("Storage opened at {:?} ({} keys)", path, entries.len());

        Ok(Self { path, entries })
    }

    /// Write the whole map to disk
    fn flush(&self) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize storage")?;

        // Write to a sibling temp file then rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).context("Failed to write storage file")?;
        fs::rename(&tmp, &self.path).context("Failed to replace storage file")?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Process-local store, nothing touches disk
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with initial entries
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("local_storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("access_token", "t1").unwrap();
        store.set("user_data", r#"{"id":1}"#).unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("access_token").as_deref(), Some("t1"));
        assert_eq!(reopened.get("user_data").as_deref(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn test_file_store_remove_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");

        let mut store = FileStore::open(&path).unwrap();
        store.set("access_token", "t1").unwrap();
        store.remove("access_token").unwrap();
        // Removing an absent key is fine
        store.remove("access_token").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("access_token"), None);
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("access_token"), None);

        // Next write repairs the file
        store.set("access_token", "t2").unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("access_token").as_deref(), Some("t2"));
    }

    #[test]
    fn test_memory_store_seeded() {
        let mut store = MemoryStore::with_entries([("a", "1")]);
        assert_eq!(store.get("a").as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a"), None);
    }
}
