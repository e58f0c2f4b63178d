//! In-memory data store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use quizkit_core::error::{ReadError, WriteError};
use quizkit_core::traits::DataStore;

/// A data store that keeps everything in a map.
///
/// Nothing survives the process. Useful for throwaway sessions and for
/// exercising the state provider without touching the filesystem; write
/// failures can be injected with [`MemoryStore::fail_writes`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
    write_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save` fail (or succeed again with `false`).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u32 {
        self.write_count.load(Ordering::SeqCst)
    }

    /// A copy of the bytes stored under `key`.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map is still a consistent map: every write is a single insert.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DataStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ReadError> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), WriteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WriteError::Io {
                key: key.to_string(),
                source: std::io::Error::other("storage quota exceeded"),
            });
        }
        self.lock().insert(key.to_string(), bytes.to_vec());
        self.write_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
