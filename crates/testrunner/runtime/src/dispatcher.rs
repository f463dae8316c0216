//! Run dispatch
//!
//! Turns a run request, an optional tests id and an optional tests type,
//! into the set of test classes to execute, consulting the policy gate at
//! every step, and executes them. Disabled paths are skipped with a
//! warning rather than failing the request.

use crate::executor::TestExecutor;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use testrunner_policy::PolicyGate;
use testrunner_registry::TestRegistry;
use testrunner_types::{ExecutionContext, RunResult, RunResultSet, TestClassRef, TestsId, TestsType};

/// Resolves run requests and executes the selected test classes
pub struct Dispatcher {
    registry: Arc<dyn TestRegistry>,
    policy: Arc<dyn PolicyGate>,
    executor: Arc<dyn TestExecutor>,
    context: ExecutionContext,
    max_concurrent: usize,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<dyn TestRegistry>,
        policy: Arc<dyn PolicyGate>,
        executor: Arc<dyn TestExecutor>,
    ) -> Self {
        Self {
            registry,
            policy,
            executor,
            context: ExecutionContext::new("testrunner"),
            max_concurrent: 1,
        }
    }

    /// Context handed to every test instance
    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    /// Number of test classes executed at the same time
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn registry(&self) -> &Arc<dyn TestRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> &Arc<dyn PolicyGate> {
        &self.policy
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    /// Resolve and execute the tests selected by the request
    pub async fn run_tests(
        &self,
        tests_id: Option<&TestsId>,
        tests_type: Option<TestsType>,
    ) -> RunResultSet {
        let classes = self.resolve(tests_id, tests_type);
        if classes.is_empty() {
            return RunResultSet::new();
        }
        self.execute(classes).await
    }

    /// Test classes selected by the request after policy filtering
    pub fn resolve(
        &self,
        tests_id: Option<&TestsId>,
        tests_type: Option<TestsType>,
    ) -> Vec<TestClassRef> {
        if !self.policy.is_enabled() {
            tracing::warn!("Test running is DISABLED on this system: tests cannot be run");
            return Vec::new();
        }

        match (tests_id, tests_type) {
            (None, None) => self.resolve_all(),
            (None, Some(tests_type)) => self.resolve_enabled(None, tests_type),
            (Some(tests_id), None) => match self.registry.tests_type_for(tests_id) {
                Some(tests_type) => self.resolve_enabled(Some(tests_id), tests_type),
                None => {
                    tracing::warn!(
                        tests_id = %tests_id,
                        "No tests registered for tests id: no tests will be run"
                    );
                    Vec::new()
                }
            },
            (Some(tests_id), Some(tests_type)) => {
                self.resolve_enabled(Some(tests_id), tests_type)
            }
        }
    }

    /// Execute the given classes, isolating failures per class
    pub async fn execute(&self, classes: Vec<TestClassRef>) -> RunResultSet {
        tracing::debug!(
            classes = classes.len(),
            max_concurrent = self.max_concurrent,
            "Executing test classes"
        );

        if self.max_concurrent <= 1 {
            let mut results = RunResultSet::new();
            for class in classes {
                let result = self.run_class(&class).await;
                results.insert(class, result);
            }
            return results;
        }

        stream::iter(classes)
            .map(|class| async move {
                let result = self.run_class(&class).await;
                (class, result)
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<RunResultSet>()
            .await
    }

    /// Run one class; infrastructure failures become a synthetic error result
    pub async fn run_class(&self, class: &TestClassRef) -> RunResult {
        match self.executor.execute(class, &self.context).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(
                    class = %class,
                    error = %err,
                    "Test class could not be executed"
                );
                RunResult::infrastructure_error(class.name(), err.kind(), err.to_string())
            }
        }
    }

    fn resolve_all(&self) -> Vec<TestClassRef> {
        let snapshot = self.registry.snapshot();
        let mut selected: HashSet<TestClassRef> = snapshot.classes(None).into_iter().collect();

        for tests_type in snapshot.tests_types() {
            if !self.policy.check_type(tests_type) {
                tracing::warn!(
                    tests_type = %tests_type,
                    "Test type is DISABLED: tests of this type will not be run"
                );
                for class in snapshot.classes(Some(tests_type)) {
                    selected.remove(&class);
                }
            }
        }

        if selected.is_empty() {
            tracing::warn!("No tests to run: nothing registered for the enabled test types");
        }

        let mut classes: Vec<_> = selected.into_iter().collect();
        classes.sort();
        classes
    }

    fn resolve_enabled(
        &self,
        tests_id: Option<&TestsId>,
        tests_type: TestsType,
    ) -> Vec<TestClassRef> {
        if !self.policy.check_type(tests_type) {
            tracing::warn!(
                tests_type = %tests_type,
                "Test type is DISABLED: tests of this type will not be run"
            );
            return Vec::new();
        }

        let classes = self.registry.registered_tests(tests_id, Some(tests_type));
        if classes.is_empty() {
            tracing::warn!(
                tests_id = tests_id.map(TestsId::as_str),
                tests_type = %tests_type,
                "No tests to run for the request"
            );
        }
        classes
    }
}
