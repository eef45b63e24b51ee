//! Durable local key-value storage
//!
//! Records are plain JSON text stored under a fixed namespace. Two implementations are provided:
//! [`FileStore`] keeps one file per namespace in a directory, [`MemoryStore`] keeps everything
//! in process memory.

mod error;

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

pub use error::{StorageError, StorageResult};

/// Namespace holding the serialized signed URL cache
pub const SIGNED_URL_CACHE_NAMESPACE: &str = "pixellens.signed-url-cache";

/// Namespace holding the serialized favorites list
pub const FAVORITES_NAMESPACE: &str = "pixellens.favorites";

/// A durable key-value store of text records
pub trait LocalStore: Send + Sync {
    /// Reads the record stored under `namespace`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the namespace is invalid or the record cannot be read
    fn read(&self, namespace: &str) -> StorageResult<Option<String>>;

    /// Replaces the record stored under `namespace`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the namespace is invalid or the record cannot be written
    fn write(&self, namespace: &str, contents: &str) -> StorageResult<()>;

    /// Removes the record stored under `namespace`. Removing an absent record succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the namespace is invalid or the record cannot be removed
    fn remove(&self, namespace: &str) -> StorageResult<()>;
}

fn validate_namespace(namespace: &str) -> StorageResult<()> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        && !namespace.starts_with('.');

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidNamespace(namespace.to_string()))
    }
}

/// File-backed store, one `<namespace>.json` file per record
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the records
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, namespace: &str) -> StorageResult<PathBuf> {
        validate_namespace(namespace)?;
        Ok(self.dir.join(format!("{namespace}.json")))
    }
}

impl LocalStore for FileStore {
    fn read(&self, namespace: &str) -> StorageResult<Option<String>> {
        let path = self.record_path(namespace)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                namespace: namespace.to_string(),
                source,
            }),
        }
    }

    fn write(&self, namespace: &str, contents: &str) -> StorageResult<()> {
        let path = self.record_path(namespace)?;
        let io_err = |source| StorageError::Io {
            namespace: namespace.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Write to a sibling and rename so readers never observe a partial record
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, contents).map_err(io_err)?;
        std::fs::rename(&tmp_path, &path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            io_err(e)
        })
    }

    fn remove(&self, namespace: &str) -> StorageResult<()> {
        let path = self.record_path(namespace)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                namespace: namespace.to_string(),
                source,
            }),
        }
    }
}

/// In-process store, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn read(&self, namespace: &str) -> StorageResult<Option<String>> {
        validate_namespace(namespace)?;
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(namespace).cloned())
    }

    fn write(&self, namespace: &str, contents: &str) -> StorageResult<()> {
        validate_namespace(namespace)?;
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(namespace.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str) -> StorageResult<()> {
        validate_namespace(namespace)?;
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(namespace);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_namespace() {
        assert!(validate_namespace(SIGNED_URL_CACHE_NAMESPACE).is_ok());
        assert!(validate_namespace(FAVORITES_NAMESPACE).is_ok());
        assert!(validate_namespace("images_v2").is_ok());

        assert!(validate_namespace("").is_err());
        assert!(validate_namespace("../etc/passwd").is_err());
        assert!(validate_namespace(".hidden").is_err());
        assert!(validate_namespace("with space").is_err());
    }

    #[test]
    fn test_memory_store_remove_absent_record() {
        let store = MemoryStore::new();
        assert!(store.remove(FAVORITES_NAMESPACE).is_ok());
        assert_eq!(store.read(FAVORITES_NAMESPACE).unwrap(), None);
    }
}
