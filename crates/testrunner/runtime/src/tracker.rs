//! History of test runs started by id
//!
//! Backs admin views listing which runs happened, when, and how they went.

use crate::error::Result;
use crate::service::TestRunnerService;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use testrunner_types::{RunResultSet, RunTotals, TestsType};

/// One tracked run of a tests id
#[derive(Debug, Clone, Serialize)]
pub struct TrackedRun {
    pub tests_id: String,
    /// Type owning the id when the run started
    pub tests_type: Option<TestsType>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub results: RunResultSet,
}

impl TrackedRun {
    pub fn totals(&self) -> RunTotals {
        self.results.totals()
    }

    pub fn duration_ms(&self) -> i64 {
        (self.ended_at - self.started_at).num_milliseconds()
    }
}

/// Starts runs through the service and keeps them in order
pub struct RunTracker {
    service: Arc<TestRunnerService>,
    runs: RwLock<Vec<TrackedRun>>,
}

impl RunTracker {
    pub fn new(service: Arc<TestRunnerService>) -> Self {
        Self {
            service,
            runs: RwLock::new(Vec::new()),
        }
    }

    /// Run every test registered under `tests_id` and record the run
    pub async fn start_test(&self, tests_id: &str) -> Result<TrackedRun> {
        let tests_type = self
            .service
            .get_test_type_for_tests_id(tests_id)
            .and_then(|param| TestsType::parse(&param).ok());

        let started_at = Utc::now();
        let results = self.service.run_tests(Some(tests_id), None).await?;
        let run = TrackedRun {
            tests_id: tests_id.to_string(),
            tests_type,
            started_at,
            ended_at: Utc::now(),
            results,
        };

        tracing::info!(
            tests_id = %tests_id,
            classes = run.results.len(),
            successful = run.totals().successful,
            "Tracked test run finished"
        );

        self.runs.write().push(run.clone());
        Ok(run)
    }

    /// All tracked runs, oldest first
    pub fn runs(&self) -> Vec<TrackedRun> {
        self.runs.read().clone()
    }

    /// Most recent run of `tests_id`
    pub fn latest(&self, tests_id: &str) -> Option<TrackedRun> {
        self.runs
            .read()
            .iter()
            .rev()
            .find(|run| run.tests_id == tests_id)
            .cloned()
    }

    pub fn clear(&self) {
        self.runs.write().clear();
    }
}
