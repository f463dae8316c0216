//! Run results and the helpers that summarize them

use crate::test_class::{TestClassRef, TestOutcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Description of one failed or errored test method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFailure {
    /// Test identity, `method(Class)`
    pub test: String,
    /// Kind of problem, e.g. `AssertionFailed` or a panic
    pub kind: String,
    pub message: String,
    pub trace: Option<String>,
}

impl TestFailure {
    pub fn new(
        test: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            test: test.into(),
            kind: kind.into(),
            message: message.into(),
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    fn trace_or_empty(&self) -> &str {
        self.trace.as_deref().unwrap_or("")
    }
}

/// Outcome of running every test method of one test class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_count: u32,
    pub failures: Vec<TestFailure>,
    pub errors: Vec<TestFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl Default for RunResult {
    fn default() -> Self {
        Self::new()
    }
}

impl RunResult {
    /// Start an empty result at the current time
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            run_count: 0,
            failures: Vec::new(),
            errors: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Synthetic result for a class that could not be run at all
    pub fn infrastructure_error(class_name: &str, kind: &str, message: impl Into<String>) -> Self {
        let mut result = Self::new();
        result
            .errors
            .push(TestFailure::new(class_name, kind, message));
        result
    }

    /// Record the outcome of one test method
    pub fn record(&mut self, test: impl Into<String>, outcome: TestOutcome) {
        self.run_count += 1;
        match outcome {
            TestOutcome::Passed => {}
            TestOutcome::Failed { message } => {
                self.failures
                    .push(TestFailure::new(test, "AssertionFailed", message));
            }
            TestOutcome::Errored { kind, message } => {
                self.errors.push(TestFailure::new(test, kind, message));
            }
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    pub fn failure_count(&self) -> u32 {
        self.failures.len() as u32
    }

    pub fn error_count(&self) -> u32 {
        self.errors.len() as u32
    }

    /// True when at least one test ran and none failed or errored.
    ///
    /// A class with no test methods is NOT successful.
    pub fn was_successful(&self) -> bool {
        self.errors.is_empty() && self.failures.is_empty() && self.run_count > 0
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// One-line human readable summary
    pub fn summary(&self) -> String {
        if self.was_successful() {
            format!("Tests passed : All {} test(s) passed", self.run_count)
        } else {
            format!(
                "Tests failed : Out of {} test(s): {} errors and {} failures",
                self.run_count,
                self.error_count(),
                self.failure_count()
            )
        }
    }

    /// Summary followed by one line per error and per failure
    pub fn detailed(&self) -> Vec<String> {
        let mut lines = vec![self.summary()];
        if !self.was_successful() {
            for error in &self.errors {
                lines.push(format!(
                    " Test Error: {}: {}: {}: Error trace: {}",
                    error.test,
                    error.kind,
                    error.message,
                    error.trace_or_empty()
                ));
            }
            for failure in &self.failures {
                lines.push(format!(
                    " Test Failure: {}: {}: {}: Failure trace: {}",
                    failure.test,
                    failure.message,
                    failure.kind,
                    failure.trace_or_empty()
                ));
            }
        }
        lines
    }
}

/// Aggregate counts over a whole result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Every class in the set was successful
    pub successful: bool,
    pub failures: u32,
    pub errors: u32,
    pub tests: u32,
}

/// Results of one dispatch, keyed by test class.
///
/// Iteration follows test class name order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RunResultSet {
    results: BTreeMap<TestClassRef, RunResult>,
}

impl RunResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: TestClassRef, result: RunResult) -> Option<RunResult> {
        self.results.insert(class, result)
    }

    pub fn get(&self, class: &TestClassRef) -> Option<&RunResult> {
        self.results.get(class)
    }

    /// Look up a result by fully qualified class name
    pub fn get_by_name(&self, name: &str) -> Option<&RunResult> {
        self.results
            .iter()
            .find(|(class, _)| class.name() == name)
            .map(|(_, result)| result)
    }

    pub fn contains(&self, class: &TestClassRef) -> bool {
        self.results.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TestClassRef, RunResult> {
        self.results.iter()
    }

    pub fn classes(&self) -> impl Iterator<Item = &TestClassRef> {
        self.results.keys()
    }

    /// Collapse the set into a single pass/fail flag.
    ///
    /// Walks the entries in order, taking each entry's flag as the running
    /// answer, and stops at the first unsuccessful entry that actually ran
    /// tests. An unsuccessful entry that ran nothing does not stop the walk,
    /// so a later passing entry can still make the answer `true`. An empty
    /// set is `false`.
    pub fn check_tests_success(&self) -> bool {
        let mut success = false;
        for result in self.results.values() {
            success = result.was_successful();
            if !success && result.run_count > 0 {
                break;
            }
        }
        success
    }

    /// `"<SimpleName> : <summary>"` for each class
    pub fn summarize(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|(class, result)| format!("{} : {}", class.simple_name(), result.summary()))
            .collect()
    }

    pub fn totals(&self) -> RunTotals {
        self.results.values().fold(
            RunTotals {
                successful: true,
                failures: 0,
                errors: 0,
                tests: 0,
            },
            |mut totals, result| {
                totals.failures += result.failure_count();
                totals.errors += result.error_count();
                totals.tests += result.run_count;
                totals.successful &= result.was_successful();
                totals
            },
        )
    }

    pub fn into_inner(self) -> BTreeMap<TestClassRef, RunResult> {
        self.results
    }
}

impl FromIterator<(TestClassRef, RunResult)> for RunResultSet {
    fn from_iter<I: IntoIterator<Item = (TestClassRef, RunResult)>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}

impl Extend<(TestClassRef, RunResult)> for RunResultSet {
    fn extend<I: IntoIterator<Item = (TestClassRef, RunResult)>>(&mut self, iter: I) {
        self.results.extend(iter);
    }
}

impl IntoIterator for RunResultSet {
    type Item = (TestClassRef, RunResult);
    type IntoIter = btree_map::IntoIter<TestClassRef, RunResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a RunResultSet {
    type Item = (&'a TestClassRef, &'a RunResult);
    type IntoIter = btree_map::Iter<'a, TestClassRef, RunResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_class::FnTestClass;

    fn class(name: &str) -> TestClassRef {
        FnTestClass::new(name).into_ref()
    }

    fn result_with(passed: u32, failed: u32, errored: u32) -> RunResult {
        let mut result = RunResult::new();
        for i in 0..passed {
            result.record(format!("testPass{i}(X)"), TestOutcome::Passed);
        }
        for i in 0..failed {
            result.record(format!("testFail{i}(X)"), TestOutcome::failed("expected 1 got 2"));
        }
        for i in 0..errored {
            result.record(
                format!("testError{i}(X)"),
                TestOutcome::errored("Panic", "index out of bounds"),
            );
        }
        result.finish();
        result
    }

    #[test]
    fn test_success_requires_a_run() {
        assert!(result_with(3, 0, 0).was_successful());
        assert!(!result_with(1, 1, 0).was_successful());
        assert!(!result_with(1, 0, 1).was_successful());

        let empty = result_with(0, 0, 0);
        assert_eq!(empty.run_count, 0);
        assert!(!empty.was_successful());
    }

    #[test]
    fn test_summary_text() {
        assert_eq!(
            result_with(3, 0, 0).summary(),
            "Tests passed : All 3 test(s) passed"
        );
        assert_eq!(
            result_with(1, 1, 0).summary(),
            "Tests failed : Out of 2 test(s): 0 errors and 1 failures"
        );
    }

    #[test]
    fn test_detailed_lists_errors_then_failures() {
        let lines = result_with(0, 1, 1).detailed();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with(" Test Error: testError0(X): Panic: index out of bounds"));
        assert!(lines[2]
            .starts_with(" Test Failure: testFail0(X): expected 1 got 2: AssertionFailed"));

        let passing = result_with(2, 0, 0).detailed();
        assert_eq!(passing, vec!["Tests passed : All 2 test(s) passed".to_string()]);
    }

    #[test]
    fn test_infrastructure_error_is_unsuccessful() {
        let result = RunResult::infrastructure_error("x.Broken", "InstantiationFailed", "no ctor");
        assert_eq!(result.run_count, 0);
        assert_eq!(result.error_count(), 1);
        assert!(!result.was_successful());
    }

    #[test]
    fn test_check_tests_success_empty_is_false() {
        assert!(!RunResultSet::new().check_tests_success());
    }

    #[test]
    fn test_check_tests_success_follows_walk_order() {
        let set: RunResultSet = [
            (class("a.Pass"), result_with(2, 0, 0)),
            (class("b.Pass"), result_with(1, 0, 0)),
        ]
        .into_iter()
        .collect();
        assert!(set.check_tests_success());

        // A failure that ran stops the walk
        let set: RunResultSet = [
            (class("a.Fail"), result_with(1, 1, 0)),
            (class("b.Pass"), result_with(1, 0, 0)),
        ]
        .into_iter()
        .collect();
        assert!(!set.check_tests_success());

        // An empty class last leaves the answer false
        let set: RunResultSet = [
            (class("a.Pass"), result_with(1, 0, 0)),
            (class("b.Empty"), result_with(0, 0, 0)),
        ]
        .into_iter()
        .collect();
        assert!(!set.check_tests_success());

        // An empty class first does not stop the walk
        let set: RunResultSet = [
            (class("a.Empty"), result_with(0, 0, 0)),
            (class("b.Pass"), result_with(1, 0, 0)),
        ]
        .into_iter()
        .collect();
        assert!(set.check_tests_success());
    }

    #[test]
    fn test_summarize_and_totals() {
        let set: RunResultSet = [
            (class("samples.SampleTestOne"), result_with(3, 0, 0)),
            (class("samples.SampleTestTwo"), result_with(1, 1, 0)),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            set.summarize(),
            vec![
                "SampleTestOne : Tests passed : All 3 test(s) passed".to_string(),
                "SampleTestTwo : Tests failed : Out of 2 test(s): 0 errors and 1 failures"
                    .to_string(),
            ]
        );

        let totals = set.totals();
        assert!(!totals.successful);
        assert_eq!(totals.tests, 5);
        assert_eq!(totals.failures, 1);
        assert_eq!(totals.errors, 0);

        assert!(RunResultSet::new().summarize().is_empty());
    }

    #[test]
    fn test_result_set_serializes_by_class_name() {
        let set: RunResultSet = [(class("samples.SampleTestFour"), result_with(1, 0, 0))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["samples.SampleTestFour"]["run_count"], 1);
    }
}
