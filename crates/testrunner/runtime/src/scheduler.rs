//! One-shot automatic run of all registered tests at startup

use crate::dispatcher::Dispatcher;
use std::sync::Arc;
use testrunner_types::RunResultSet;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// What the startup scheduler did
#[derive(Debug)]
pub enum StartupRun {
    /// Automatic runs are off (negative delay)
    Off,

    /// Automatic runs were requested but the runner is disabled
    Disabled,

    /// Ran immediately (zero delay)
    Completed(RunResultSet),

    /// Will run once the delay has elapsed
    Scheduled(JoinHandle<RunResultSet>),
}

impl StartupRun {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, StartupRun::Scheduled(_))
    }
}

/// Schedules the automatic run of all tests for the enabled types
pub struct StartupScheduler {
    dispatcher: Arc<Dispatcher>,
}

impl StartupScheduler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Act on the configured automatic delay.
    ///
    /// A zero delay runs inline before returning; a positive delay spawns a
    /// background task which must be driven by a tokio runtime.
    pub async fn start(&self) -> StartupRun {
        let policy = self.dispatcher.policy();
        let delay_secs = policy.automatic_delay_seconds();

        if delay_secs < 0 {
            tracing::debug!("Automatic test runs are off");
            return StartupRun::Off;
        }

        if !policy.is_enabled() {
            tracing::warn!("Test running is DISABLED on this system: cannot run all tests");
            return StartupRun::Disabled;
        }

        tracing::info!(
            count = self.dispatcher.registry().class_count(),
            "Automatic test runs enabled: executing all tests for enabled test types"
        );

        if delay_secs == 0 {
            tracing::info!("Executing all current tests immediately (this is HIGHLY discouraged)");
            let results = run_all(&self.dispatcher).await;
            return StartupRun::Completed(results);
        }

        tracing::info!(delay_secs, "Delaying automatic test run");
        let dispatcher = self.dispatcher.clone();
        let handle = tokio::spawn(async move {
            sleep(Duration::from_secs(delay_secs.unsigned_abs())).await;
            run_all(&dispatcher).await
        });

        StartupRun::Scheduled(handle)
    }
}

async fn run_all(dispatcher: &Dispatcher) -> RunResultSet {
    let results = dispatcher.run_tests(None, None).await;
    for line in results.summarize() {
        tracing::info!("{}", line);
    }

    let totals = results.totals();
    tracing::info!(
        successful = totals.successful,
        tests = totals.tests,
        failures = totals.failures,
        errors = totals.errors,
        "Automatic test run complete"
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SuiteExecutor;
    use testrunner_policy::{FlagPolicyGate, PolicyConfig, PolicyGate};
    use testrunner_registry::{InMemoryTestRegistry, TestRegistry};
    use testrunner_types::{FnTestClass, TestOutcome, TestsId, TestsType};

    fn scheduler(delay: i64, enabled: bool) -> StartupScheduler {
        let registry = Arc::new(InMemoryTestRegistry::new());
        registry
            .register_tests(
                &TestsId::new("startup").unwrap(),
                TestsType::Integration,
                vec![FnTestClass::new("s.Startup")
                    .with_test("test_ok", |_| TestOutcome::Passed)
                    .into_ref()],
            )
            .unwrap();

        let policy = FlagPolicyGate::new(PolicyConfig {
            enabled,
            test_delay_seconds: delay,
            ..PolicyConfig::default()
        });
        assert_eq!(policy.automatic_delay_seconds(), delay);

        let dispatcher =
            Dispatcher::new(registry, Arc::new(policy), Arc::new(SuiteExecutor::new()));
        StartupScheduler::new(Arc::new(dispatcher))
    }

    #[tokio::test]
    async fn test_negative_delay_is_off() {
        assert!(matches!(scheduler(-1, true).start().await, StartupRun::Off));
    }

    #[tokio::test]
    async fn test_disabled_runner_skips() {
        assert!(matches!(scheduler(0, false).start().await, StartupRun::Disabled));
    }

    #[tokio::test]
    async fn test_zero_delay_runs_inline() {
        match scheduler(0, true).start().await {
            StartupRun::Completed(results) => {
                assert_eq!(results.len(), 1);
                assert!(results.check_tests_success());
            }
            other => panic!("expected inline run, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_positive_delay_runs_later() {
        let run = scheduler(30, true).start().await;
        let handle = match run {
            StartupRun::Scheduled(handle) => handle,
            other => panic!("expected scheduled run, got {:?}", other),
        };

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!handle.is_finished());

        let results = handle.await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
