//! Catalog and history queries used by the listing views.

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Test, TestResult};
use crate::state::StateProvider;

/// Filter for the test catalog. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Case-insensitive substring of the title or description.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl CatalogFilter {
    pub fn matches(&self, test: &Test) -> bool {
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !test.title.to_lowercase().contains(&term)
                && !test.description.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &test.category != category {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if test.difficulty != difficulty {
                return false;
            }
        }
        true
    }

    /// Matching tests, in catalog order.
    pub fn apply<'a>(&self, tests: &'a [Test]) -> Vec<&'a Test> {
        tests.iter().filter(|t| self.matches(t)).collect()
    }
}

/// Distinct categories in first-seen order.
pub fn categories(tests: &[Test]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for test in tests {
        if !seen.contains(&test.category.as_str()) {
            seen.push(&test.category);
        }
    }
    seen
}

/// The `n` most recently created tests, newest first.
pub fn recent_tests(tests: &[Test], n: usize) -> Vec<&Test> {
    let mut sorted: Vec<&Test> = tests.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
}

/// A completed result together with the test it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct HistoryEntry<'a> {
    pub result: &'a TestResult,
    pub test: &'a Test,
}

/// Completed results joined with their tests, most recent first.
///
/// Orphaned results, whose test no longer resolves, are skipped.
pub fn completed_entries(provider: &StateProvider) -> Vec<HistoryEntry<'_>> {
    provider
        .completed_tests()
        .into_iter()
        .filter_map(|result| match provider.get_test(&result.test_id) {
            Some(test) => Some(HistoryEntry { result, test }),
            None => {
                tracing::debug!(result_id = %result.id, test_id = %result.test_id, "skipping orphaned result");
                None
            }
        })
        .collect()
}

/// Totals over a result history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub attempts: usize,
    pub average_score: f64,
    pub best_score: Option<u32>,
}

impl HistorySummary {
    pub fn compute(entries: &[HistoryEntry<'_>]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        let total: u64 = entries.iter().map(|e| u64::from(e.result.score)).sum();
        Self {
            attempts: entries.len(),
            average_score: total as f64 / entries.len() as f64,
            best_score: entries.iter().map(|e| e.result.score).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReadError, WriteError};
    use crate::model::NewTestResult;
    use crate::traits::DataStore;
    use chrono::{Duration, Utc};

    struct NullStore;

    impl DataStore for NullStore {
        fn name(&self) -> &str {
            "null"
        }
        fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, ReadError> {
            Ok(None)
        }
        fn save(&self, _key: &str, _bytes: &[u8]) -> Result<(), WriteError> {
            Ok(())
        }
    }

    fn make(id: &str, title: &str, category: &str, difficulty: Difficulty, age_days: i64) -> Test {
        Test {
            id: id.into(),
            title: title.into(),
            description: format!("About {title}"),
            time_limit: None,
            questions: vec![],
            category: category.into(),
            difficulty,
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    fn catalog() -> Vec<Test> {
        vec![
            make("1", "Web Basics", "Programming", Difficulty::Easy, 7),
            make("2", "React Fundamentals", "Programming", Difficulty::Medium, 3),
            make("3", "Basic Mathematics", "Mathematics", Difficulty::Medium, 1),
            make("4", "Set Theory", "Mathematics", Difficulty::Hard, 10),
        ]
    }

    fn ids(tests: &[&Test]) -> Vec<String> {
        tests.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let tests = catalog();
        assert_eq!(CatalogFilter::default().apply(&tests).len(), 4);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let tests = catalog();
        let filter = CatalogFilter {
            search: Some("BASIC".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&tests)), vec!["1", "3"]);

        let by_description = CatalogFilter {
            search: Some("about react".into()),
            ..Default::default()
        };
        assert_eq!(ids(&by_description.apply(&tests)), vec!["2"]);
    }

    #[test]
    fn category_and_difficulty_combine() {
        let tests = catalog();
        let filter = CatalogFilter {
            search: None,
            category: Some("Mathematics".into()),
            difficulty: Some(Difficulty::Medium),
        };
        assert_eq!(ids(&filter.apply(&tests)), vec!["3"]);
    }

    #[test]
    fn categories_are_distinct_in_first_seen_order() {
        assert_eq!(categories(&catalog()), vec!["Programming", "Mathematics"]);
    }

    #[test]
    fn recent_tests_newest_first() {
        let tests = catalog();
        assert_eq!(ids(&recent_tests(&tests, 3)), vec!["3", "2", "1"]);
    }

    #[test]
    fn completed_entries_skip_orphans() {
        let mut provider = StateProvider::open(Box::new(NullStore), catalog()).unwrap();
        let kept = provider
            .save_test_result(NewTestResult {
                test_id: "1".into(),
                answers: vec![],
                score: 80,
                time_taken: 10,
            })
            .unwrap();
        provider
            .save_test_result(NewTestResult {
                test_id: "deleted".into(),
                answers: vec![],
                score: 20,
                time_taken: 10,
            })
            .unwrap();

        let entries = completed_entries(&provider);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].result.id, kept);
        assert_eq!(entries[0].test.title, "Web Basics");
    }

    #[test]
    fn history_summary_totals() {
        let mut provider = StateProvider::open(Box::new(NullStore), catalog()).unwrap();
        for score in [40, 90, 65] {
            provider
                .save_test_result(NewTestResult {
                    test_id: "2".into(),
                    answers: vec![],
                    score,
                    time_taken: 1,
                })
                .unwrap();
        }
        let entries = completed_entries(&provider);
        let summary = HistorySummary::compute(&entries);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.best_score, Some(90));
        assert!((summary.average_score - 65.0).abs() < f64::EPSILON);

        assert_eq!(HistorySummary::compute(&[]), HistorySummary::default());
    }
}
