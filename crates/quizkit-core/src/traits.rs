//! Core trait definitions for persistence backends.
//!
//! Implemented by the `quizkit-store` crate (file-backed and in-memory
//! stores). The state provider only ever talks to a `dyn DataStore`.

use crate::error::{ReadError, WriteError};

/// Key holding the JSON array of tests.
pub const TESTS_KEY: &str = "tests";

/// Key holding the JSON array of test results.
pub const RESULTS_KEY: &str = "testResults";

// ---------------------------------------------------------------------------
// Data store trait
// ---------------------------------------------------------------------------

/// Durable key-value storage for serialized collections.
///
/// No schema validation happens at this layer; callers own serialization.
/// Writes are whole-value overwrites.
pub trait DataStore: Send + Sync {
    /// Human-readable backend name (e.g. "file").
    fn name(&self) -> &str;

    /// Load the bytes stored under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ReadError>;

    /// Replace whatever is stored under `key` with `bytes`.
    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), WriteError>;
}

impl<S: DataStore + ?Sized> DataStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ReadError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), WriteError> {
        (**self).save(key, bytes)
    }
}

impl<S: DataStore + ?Sized> DataStore for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ReadError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), WriteError> {
        (**self).save(key, bytes)
    }
}
