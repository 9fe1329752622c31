//! Key/value storage backends for save slots.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures reported by a [`Storage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend is out of space. Freeing other keys may allow a retry.
    #[error("storage quota exceeded: {requested} bytes requested, {available} available")]
    QuotaExceeded { requested: usize, available: usize },
    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),
}

/// String key/value store holding serialized snapshots.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory storage with an optional byte quota over all stored values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses writes once the stored values would exceed
    /// `bytes` in total.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(bytes),
        }
    }

    /// Bytes currently stored.
    pub fn used(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self.entries.get(key).map_or(0, String::len);
            let available = quota.saturating_sub(self.used() - replaced);
            if value.len() > available {
                return Err(StorageError::QuotaExceeded {
                    requested: value.len(),
                    available,
                });
            }
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory. Writes go to a temp file that
/// is then renamed over the target, so a crash never leaves a torn file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        write_atomic(&self.path_for(key), value.as_bytes())?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_path_for(path);
    fs::write(&tmp, bytes)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("save.json");
    path.with_file_name(format!("{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_quota_counts_replaced_value_once() {
        let mut s = MemoryStorage::with_quota(10);
        s.set("a", "12345").unwrap();
        s.set("a", "1234567890").unwrap();
        assert!(matches!(
            s.set("b", "x"),
            Err(StorageError::QuotaExceeded {
                requested: 1,
                available: 0
            })
        ));
        s.remove("a").unwrap();
        s.set("b", "x").unwrap();
        assert_eq!(s.used(), 1);
    }

    #[test]
    fn memory_remove_missing_is_ok() {
        let mut s = MemoryStorage::new();
        assert!(s.remove("nothing").is_ok());
        assert_eq!(s.get("nothing").unwrap(), None);
    }

    #[test]
    fn file_storage_roundtrip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = FileStorage::new(dir.path().join("saves"));
        assert_eq!(s.get("slot").unwrap(), None);
        s.set("slot", "{\"a\":1}").unwrap();
        s.set("slot", "{\"a\":2}").unwrap();
        assert_eq!(s.get("slot").unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(!dir.path().join("saves/slot.json.tmp").exists());
        s.remove("slot").unwrap();
        s.remove("slot").unwrap();
        assert_eq!(s.get("slot").unwrap(), None);
    }
}
