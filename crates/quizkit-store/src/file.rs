//! File-backed data store: one JSON file per key.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use quizkit_core::error::{ReadError, WriteError};
use quizkit_core::traits::DataStore;

/// Stores each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write_atomically(&self, key: &str, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

impl DataStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, ReadError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ReadError {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&self, key: &str, bytes: &[u8]) -> Result<(), WriteError> {
        self.write_atomically(key, bytes).map_err(|source| {
            tracing::warn!("failed to write {}: {source}", self.path_for(key).display());
            WriteError::Io {
                key: key.to_string(),
                source,
            }
        })?;
        tracing::debug!("wrote {} bytes to {}", bytes.len(), self.path_for(key).display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizkit_core::state::StateProvider;
    use quizkit_core::traits::{RESULTS_KEY, TESTS_KEY};

    #[test]
    fn missing_key_loads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.load(TESTS_KEY).unwrap(), None);
    }

    #[test]
    fn save_overwrites_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("data"));

        store.save(RESULTS_KEY, b"[1,2,3]").unwrap();
        store.save(RESULTS_KEY, b"[]").unwrap();

        assert_eq!(store.load(RESULTS_KEY).unwrap(), Some(b"[]".to_vec()));
        assert!(store.path_for(RESULTS_KEY).ends_with("testResults.json"));
    }

    #[test]
    fn unreadable_key_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        std::fs::create_dir(store.path_for(TESTS_KEY)).unwrap();

        let err = store.load(TESTS_KEY).unwrap_err();
        assert_eq!(err.key, TESTS_KEY);
    }

    #[test]
    fn write_into_a_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let store = FileStore::new(&blocker);
        let err = store.save(TESTS_KEY, b"[]").unwrap_err();
        assert!(matches!(err, WriteError::Io { ref key, .. } if key == TESTS_KEY));
    }

    #[test]
    fn provider_round_trips_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let seed = quizkit_core::seed::sample_tests();
        let first_id = seed[0].id.clone();

        {
            let provider =
                StateProvider::open(Box::new(FileStore::new(dir.path())), seed).unwrap();
            assert_eq!(provider.tests().len(), 3);
        }
        assert!(dir.path().join("tests.json").exists());

        let reopened = StateProvider::open(Box::new(FileStore::new(dir.path())), vec![]).unwrap();
        assert_eq!(reopened.tests().len(), 3);
        assert!(reopened.get_test(&first_id).is_some());
    }
}
