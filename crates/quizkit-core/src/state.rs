//! The state provider: the single in-process source of truth for the test
//! catalog and the result history.
//!
//! On [`StateProvider::open`] both collections are loaded from the data
//! store. If no catalog is stored yet the seed catalog is installed and
//! persisted. Every mutation appends in memory first and then re-persists
//! the whole affected collection. A failed write is reported to the caller
//! while the in-memory state keeps the mutation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{QuizError, WriteError};
use crate::model::{NewTest, NewTestResult, Test, TestResult};
use crate::traits::{DataStore, RESULTS_KEY, TESTS_KEY};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Cached tests and results, mirrored to a [`DataStore`].
pub struct StateProvider {
    store: Box<dyn DataStore>,
    tests: Vec<Test>,
    results: Vec<TestResult>,
    clock: Clock,
}

impl std::fmt::Debug for StateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateProvider")
            .field("store", &self.store.name())
            .field("tests", &self.tests.len())
            .field("results", &self.results.len())
            .finish()
    }
}

impl StateProvider {
    /// Load state from `store`, installing `seed` if no catalog is stored.
    pub fn open(store: Box<dyn DataStore>, seed: Vec<Test>) -> Result<Self, QuizError> {
        let tests = match load_collection::<Test>(store.as_ref(), TESTS_KEY)? {
            Some(tests) => {
                tracing::debug!("loaded {} tests from {} store", tests.len(), store.name());
                tests
            }
            None => {
                tracing::info!("no stored catalog, installing {} seed tests", seed.len());
                persist(store.as_ref(), TESTS_KEY, &seed).map_err(|source| QuizError::Write {
                    id: TESTS_KEY.to_string(),
                    source,
                })?;
                seed
            }
        };

        let results = load_collection::<TestResult>(store.as_ref(), RESULTS_KEY)?
            .unwrap_or_default();
        tracing::debug!("loaded {} results", results.len());

        Ok(Self {
            store,
            tests,
            results,
            clock: Box::new(Utc::now),
        })
    }

    /// Replace the clock used to stamp result dates.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// All tests, in insertion order.
    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    /// All results, in insertion order.
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Append a test under a freshly generated id and persist the catalog.
    ///
    /// No validation happens here; see [`crate::authoring::validate_new_test`].
    pub fn add_test(&mut self, test: NewTest) -> Result<String, QuizError> {
        let id = Uuid::new_v4().to_string();
        self.tests.push(test.with_id(id.clone()));
        tracing::info!(test_id = %id, "added test");

        persist(self.store.as_ref(), TESTS_KEY, &self.tests).map_err(|source| {
            tracing::error!(test_id = %id, "failed to persist catalog: {source}");
            QuizError::Write {
                id: id.clone(),
                source,
            }
        })?;
        Ok(id)
    }

    pub fn get_test(&self, id: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.id == id)
    }

    /// Like [`get_test`](Self::get_test) but a miss is a `TestNotFound` error.
    pub fn require_test(&self, id: &str) -> Result<&Test, QuizError> {
        self.get_test(id)
            .ok_or_else(|| QuizError::TestNotFound(id.to_string()))
    }

    /// Append a result stamped with the current time and persist the history.
    pub fn save_test_result(&mut self, result: NewTestResult) -> Result<String, QuizError> {
        let id = Uuid::new_v4().to_string();
        let date = (self.clock)();
        self.results.push(TestResult {
            id: id.clone(),
            test_id: result.test_id,
            answers: result.answers,
            score: result.score,
            time_taken: result.time_taken,
            date,
        });
        tracing::info!(result_id = %id, "saved test result");

        persist(self.store.as_ref(), RESULTS_KEY, &self.results).map_err(|source| {
            tracing::error!(result_id = %id, "failed to persist results: {source}");
            QuizError::Write {
                id: id.clone(),
                source,
            }
        })?;
        Ok(id)
    }

    pub fn get_test_result(&self, id: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.id == id)
    }

    /// Like [`get_test_result`](Self::get_test_result) but a miss is a
    /// `ResultNotFound` error.
    pub fn require_test_result(&self, id: &str) -> Result<&TestResult, QuizError> {
        self.get_test_result(id)
            .ok_or_else(|| QuizError::ResultNotFound(id.to_string()))
    }

    /// All results, most recent first. Equal dates keep insertion order.
    pub fn completed_tests(&self) -> Vec<&TestResult> {
        let mut completed: Vec<&TestResult> = self.results.iter().collect();
        completed.sort_by(|a, b| b.date.cmp(&a.date));
        completed
    }
}

fn load_collection<T: DeserializeOwned>(
    store: &dyn DataStore,
    key: &str,
) -> Result<Option<Vec<T>>, QuizError> {
    let Some(bytes) = store.load(key)? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| QuizError::Corrupt {
            key: key.to_string(),
            source,
        })
}

fn persist<T: Serialize>(store: &dyn DataStore, key: &str, items: &[T]) -> Result<(), WriteError> {
    let bytes = serde_json::to_vec_pretty(items).map_err(|source| WriteError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.save(key, &bytes)
}
