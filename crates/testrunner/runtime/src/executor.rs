//! Execution primitive
//!
//! Runs every test method of one test class, each on a fresh instance that
//! has been handed the execution context. A failed check and an unexpected
//! break are recorded separately; a panic inside a method counts as an
//! error. Only the inability to build instances is reported as an
//! [`ExecutionError`].

use crate::error::ExecutionError;
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use testrunner_types::{ExecutionContext, RunResult, TestClassRef, TestInstance, TestOutcome};
use tracing::{debug, instrument};

/// Runs one test class and reports its result
#[async_trait]
pub trait TestExecutor: Send + Sync {
    async fn execute(
        &self,
        class: &TestClassRef,
        context: &ExecutionContext,
    ) -> Result<RunResult, ExecutionError>;
}

/// Default executor running test methods on the blocking thread pool
#[derive(Debug, Clone, Copy, Default)]
pub struct SuiteExecutor;

impl SuiteExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Run a test class on the calling thread
    pub fn run_blocking(
        class: &TestClassRef,
        context: &ExecutionContext,
    ) -> Result<RunResult, ExecutionError> {
        let methods = distinct_methods(class.test_methods());

        // Build the whole suite before running anything
        let mut suite: Vec<(String, Box<dyn TestInstance>)> = Vec::with_capacity(methods.len());
        for method in methods {
            let mut instance =
                class
                    .instantiate()
                    .map_err(|err| ExecutionError::Instantiation {
                        class: class.name().to_string(),
                        reason: err.to_string(),
                    })?;
            instance.inject(context);
            suite.push((method, instance));
        }

        let mut result = RunResult::new();
        for (method, mut instance) in suite {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| instance.run_test(&method)))
                .unwrap_or_else(|payload| TestOutcome::errored("Panic", panic_message(&*payload)));
            result.record(format!("{}({})", method, class.simple_name()), outcome);
        }
        result.finish();

        Ok(result)
    }
}

#[async_trait]
impl TestExecutor for SuiteExecutor {
    #[instrument(skip(self, class, context), fields(class = %class))]
    async fn execute(
        &self,
        class: &TestClassRef,
        context: &ExecutionContext,
    ) -> Result<RunResult, ExecutionError> {
        let worker_class = class.clone();
        let worker_context = context.clone();

        let result = tokio::task::spawn_blocking(move || {
            SuiteExecutor::run_blocking(&worker_class, &worker_context)
        })
        .await
        .map_err(|err| ExecutionError::WorkerFailed {
            class: class.name().to_string(),
            reason: err.to_string(),
        })??;

        debug!(
            run_count = result.run_count,
            failures = result.failure_count(),
            errors = result.error_count(),
            "Test class executed"
        );

        Ok(result)
    }
}

fn distinct_methods(methods: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    methods
        .into_iter()
        .filter(|method| seen.insert(method.clone()))
        .collect()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "test panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use testrunner_types::{FnTestClass, InstantiationError, TestClass};

    #[derive(Debug)]
    struct Unbuildable;

    impl TestClass for Unbuildable {
        fn name(&self) -> &str {
            "fixtures.Unbuildable"
        }

        fn test_methods(&self) -> Vec<String> {
            vec!["test_anything".to_string()]
        }

        fn instantiate(&self) -> Result<Box<dyn TestInstance>, InstantiationError> {
            Err("constructor refused".into())
        }
    }

    fn context() -> ExecutionContext {
        ExecutionContext::new("unit")
    }

    #[test]
    fn test_all_passing() {
        let class = FnTestClass::new("fixtures.AllGood")
            .with_test("test_one", |_| TestOutcome::Passed)
            .with_test("test_two", |_| TestOutcome::Passed)
            .into_ref();

        let result = SuiteExecutor::run_blocking(&class, &context()).unwrap();
        assert_eq!(result.run_count, 2);
        assert!(result.was_successful());
    }

    #[test]
    fn test_failure_and_error_are_kept_apart() {
        let class = FnTestClass::new("fixtures.Mixed")
            .with_test("test_ok", |_| TestOutcome::Passed)
            .with_test("test_check", |_| TestOutcome::failed("expected 1 but was 2"))
            .with_test("test_broken", |_| {
                TestOutcome::errored("NullReference", "nothing there")
            })
            .into_ref();

        let result = SuiteExecutor::run_blocking(&class, &context()).unwrap();
        assert_eq!(result.run_count, 3);
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.failures[0].test, "test_check(Mixed)");
        assert_eq!(result.errors[0].kind, "NullReference");
    }

    #[test]
    fn test_panic_counts_as_error() {
        let class = FnTestClass::new("fixtures.Panicky")
            .with_test("test_panics", |_| panic!("boom"))
            .with_test("test_after", |_| TestOutcome::Passed)
            .into_ref();

        let result = SuiteExecutor::run_blocking(&class, &context()).unwrap();
        assert_eq!(result.run_count, 2);
        assert_eq!(result.failure_count(), 0);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors[0].kind, "Panic");
        assert_eq!(result.errors[0].message, "boom");
    }

    #[test]
    fn test_fresh_instance_per_method_with_context() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let class = FnTestClass::new("fixtures.Context")
            .with_test("test_a", move |ctx| {
                counter.fetch_add(1, Ordering::SeqCst);
                match ctx.get::<u32>("answer") {
                    Some(value) if *value == 42 => TestOutcome::Passed,
                    _ => TestOutcome::failed("context not injected"),
                }
            })
            .into_ref();

        let ctx = ExecutionContext::new("unit").with("answer", 42u32);
        let result = SuiteExecutor::run_blocking(&class, &ctx).unwrap();
        assert!(result.was_successful());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_methods_run_once() {
        let class = FnTestClass::new("fixtures.Dup")
            .with_test("test_same", |_| TestOutcome::Passed)
            .with_test("test_same", |_| TestOutcome::Passed)
            .into_ref();

        let result = SuiteExecutor::run_blocking(&class, &context()).unwrap();
        assert_eq!(result.run_count, 1);
    }

    #[test]
    fn test_no_methods_is_not_successful() {
        let class = FnTestClass::new("fixtures.Empty").into_ref();
        let result = SuiteExecutor::run_blocking(&class, &context()).unwrap();
        assert_eq!(result.run_count, 0);
        assert!(!result.was_successful());
    }

    #[tokio::test]
    async fn test_instantiation_failure() {
        let class = TestClassRef::new(Unbuildable);
        let err = SuiteExecutor::new()
            .execute(&class, &context())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "InstantiationFailed");
        assert!(err.to_string().contains("constructor refused"));
    }

    #[tokio::test]
    async fn test_execute_on_blocking_pool() {
        let class = FnTestClass::new("fixtures.Async")
            .with_test("test_one", |_| TestOutcome::Passed)
            .into_ref();

        let result = SuiteExecutor::new().execute(&class, &context()).await.unwrap();
        assert!(result.was_successful());
    }
}
