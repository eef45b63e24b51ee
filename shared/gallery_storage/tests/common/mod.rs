#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use gallery_storage::{LocalStore, MemoryStore, StorageError, StorageResult};

/// Store whose writes always fail, reads and removes go to an inner memory store
#[derive(Default)]
pub struct ReadOnlyStore {
    inner: MemoryStore,
    pub write_attempts: AtomicUsize,
}

impl ReadOnlyStore {
    pub fn with_record(namespace: &str, contents: &str) -> Self {
        let store = Self::default();
        store.inner.write(namespace, contents).unwrap();
        store
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

impl LocalStore for ReadOnlyStore {
    fn read(&self, namespace: &str) -> StorageResult<Option<String>> {
        self.inner.read(namespace)
    }

    fn write(&self, namespace: &str, _contents: &str) -> StorageResult<()> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Io {
            namespace: namespace.to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only store"),
        })
    }

    fn remove(&self, namespace: &str) -> StorageResult<()> {
        self.inner.remove(namespace)
    }
}
