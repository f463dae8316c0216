//! Test runner service
//!
//! [`TestRunnerService`] is the one object callers hold: it owns the
//! registry, the policy gate and the dispatcher, and exposes them through a
//! string-keyed facade for callers (admin tools, other components) that
//! deal in raw ids and type names. Typed callers can reach the parts
//! directly through [`TestRunnerService::registry`] and friends.

use crate::config::TestRunnerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{Result, TestRunnerError};
use crate::executor::{SuiteExecutor, TestExecutor};
use crate::scheduler::{StartupRun, StartupScheduler};
use std::sync::Arc;
use testrunner_policy::{FlagPolicyGate, PolicyGate};
use testrunner_registry::{InMemoryTestRegistry, TestRegistry};
use testrunner_types::{ExecutionContext, RunResultSet, TestClassRef, TestsId, TestsType};

/// Owns the registry, policy gate and dispatcher for one process
pub struct TestRunnerService {
    registry: Arc<dyn TestRegistry>,
    policy: Arc<dyn PolicyGate>,
    dispatcher: Arc<Dispatcher>,
}

/// How a caller-supplied tests id narrows a lookup
enum IdFilter {
    Any,
    Id(TestsId),
    /// Empty id: can never have been registered
    Nothing,
}

fn id_filter(tests_id: Option<&str>) -> IdFilter {
    match tests_id {
        None => IdFilter::Any,
        Some(value) => TestsId::new(value).map_or(IdFilter::Nothing, IdFilter::Id),
    }
}

fn parse_type(tests_type: Option<&str>) -> Result<Option<TestsType>> {
    tests_type
        .map(TestsType::parse)
        .transpose()
        .map_err(TestRunnerError::from)
}

impl TestRunnerService {
    pub fn builder() -> TestRunnerServiceBuilder {
        TestRunnerServiceBuilder::new()
    }

    /// Service with default parts configured from `config`
    pub fn new(config: TestRunnerConfig) -> Self {
        TestRunnerServiceBuilder::new().with_config(config).build()
    }

    pub fn registry(&self) -> &Arc<dyn TestRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> &Arc<dyn PolicyGate> {
        &self.policy
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn context(&self) -> &ExecutionContext {
        self.dispatcher.context()
    }

    /// Log the configuration and start the automatic run, if any
    pub async fn init(&self) -> StartupRun {
        tracing::info!("{}", self.policy.snapshot().describe());
        StartupScheduler::new(self.dispatcher.clone()).start().await
    }

    /// Drop every registration
    pub fn shutdown(&self) {
        self.registry.unregister_tests(None, None);
        tracing::info!("Test runner shut down: all registrations cleared");
    }

    // Registry facade

    /// Registered tests ids, sorted, optionally limited to one type
    pub fn get_tests_ids(&self, tests_type: Option<&str>) -> Result<Vec<String>> {
        let tests_type = parse_type(tests_type)?;
        Ok(self
            .registry
            .tests_ids(tests_type)
            .into_iter()
            .map(String::from)
            .collect())
    }

    /// Parameter keys of the types that currently have registrations
    pub fn get_tests_types(&self) -> Vec<String> {
        self.registry
            .tests_types()
            .into_iter()
            .map(|tests_type| tests_type.param().to_string())
            .collect()
    }

    /// Parameter key of the type owning `tests_id`, if registered
    pub fn get_test_type_for_tests_id(&self, tests_id: &str) -> Option<String> {
        let tests_id = TestsId::new(tests_id).ok()?;
        self.registry
            .tests_type_for(&tests_id)
            .map(|tests_type| tests_type.param().to_string())
    }

    pub fn get_registered_tests(
        &self,
        tests_id: Option<&str>,
        tests_type: Option<&str>,
    ) -> Result<Vec<TestClassRef>> {
        let tests_type = parse_type(tests_type)?;
        Ok(match id_filter(tests_id) {
            IdFilter::Any => self.registry.registered_tests(None, tests_type),
            IdFilter::Id(tests_id) => self.registry.registered_tests(Some(&tests_id), tests_type),
            IdFilter::Nothing => Vec::new(),
        })
    }

    pub fn register_test(
        &self,
        tests_id: &str,
        tests_type: &str,
        class: TestClassRef,
    ) -> Result<()> {
        self.register_tests(tests_id, tests_type, vec![class])
    }

    /// Register classes under an id; a different type replaces the id's group
    pub fn register_tests(
        &self,
        tests_id: &str,
        tests_type: &str,
        classes: Vec<TestClassRef>,
    ) -> Result<()> {
        let tests_id = TestsId::new(tests_id)?;
        let tests_type = TestsType::parse(tests_type)?;
        self.registry.register_tests(&tests_id, tests_type, classes)?;
        Ok(())
    }

    /// Remove registrations; unknown ids and unknown types are a no-op
    pub fn unregister_tests(&self, tests_id: Option<&str>, tests_type: Option<&str>) {
        let tests_type = match parse_type(tests_type) {
            Ok(tests_type) => tests_type,
            Err(err) => {
                tracing::debug!(error = %err, "Nothing to unregister for unknown tests type");
                return;
            }
        };
        match id_filter(tests_id) {
            IdFilter::Any => self.registry.unregister_tests(None, tests_type),
            IdFilter::Id(tests_id) => self.registry.unregister_tests(Some(&tests_id), tests_type),
            IdFilter::Nothing => {}
        }
    }

    // Dispatch facade

    /// Run the selected tests; policy skips produce an empty result set
    pub async fn run_tests(
        &self,
        tests_id: Option<&str>,
        tests_type: Option<&str>,
    ) -> Result<RunResultSet> {
        if !self.policy.is_enabled() {
            tracing::warn!("Test running is DISABLED on this system: tests cannot be run");
            return Ok(RunResultSet::new());
        }
        let tests_type = parse_type(tests_type)?;
        Ok(match id_filter(tests_id) {
            IdFilter::Any => self.dispatcher.run_tests(None, tests_type).await,
            IdFilter::Id(tests_id) => self.dispatcher.run_tests(Some(&tests_id), tests_type).await,
            IdFilter::Nothing => {
                tracing::warn!("Empty tests id: no tests will be run");
                RunResultSet::new()
            }
        })
    }

    /// Run one class without registering it.
    ///
    /// Returns the summary line when every test passed, otherwise logs the
    /// detailed report and fails with [`TestRunnerError::TestsFailed`].
    pub async fn execute_tests(&self, class: TestClassRef) -> Result<String> {
        let result = self.dispatcher.run_class(&class).await;
        let summary = result.summary();

        if result.was_successful() {
            tracing::info!(class = %class, "{}", summary);
            return Ok(summary);
        }

        tracing::warn!(
            class = %class,
            "Test failed for {} (details follow)",
            class.simple_name()
        );
        for line in result.detailed() {
            tracing::warn!(class = %class, "{}", line);
        }

        Err(TestRunnerError::TestsFailed {
            class: class.name().to_string(),
            summary,
        })
    }

    // Policy facade

    pub fn automatic_test_delay_seconds(&self) -> i64 {
        self.policy.automatic_delay_seconds()
    }

    /// Delay for the automatic run: negative is off, zero runs immediately
    pub fn set_automatic_test_delay(&self, seconds: i64) {
        self.policy.set_automatic_delay_seconds(seconds);
    }

    pub fn is_testing_enabled(&self) -> bool {
        self.policy.is_enabled()
    }

    pub fn set_testing_enabled(&self, enabled: bool) {
        self.policy.set_enabled(enabled);
    }

    /// Raw per-type switch, regardless of the global switch
    pub fn check_type(&self, tests_type: &str) -> Result<bool> {
        Ok(self.policy.check_type_str(tests_type)?)
    }

    /// Effective per-type switch (global switch and type flag)
    pub fn get_test_runner_param(&self, parameter: &str) -> Result<bool> {
        Ok(self.policy.get_param(parameter)?)
    }

    pub fn set_test_runner_param(&self, parameter: &str, value: bool) -> Result<()> {
        Ok(self.policy.set_param(parameter, value)?)
    }
}

/// Builder for [`TestRunnerService`]
pub struct TestRunnerServiceBuilder {
    config: TestRunnerConfig,
    registry: Option<Arc<dyn TestRegistry>>,
    policy: Option<Arc<dyn PolicyGate>>,
    executor: Option<Arc<dyn TestExecutor>>,
    context: Option<ExecutionContext>,
}

impl Default for TestRunnerServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunnerServiceBuilder {
    pub fn new() -> Self {
        Self {
            config: TestRunnerConfig::default(),
            registry: None,
            policy: None,
            executor: None,
            context: None,
        }
    }

    /// Configuration used for the default policy gate and execution settings
    pub fn with_config(mut self, config: TestRunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn TestRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_policy_gate(mut self, gate: Arc<dyn PolicyGate>) -> Self {
        self.policy = Some(gate);
        self
    }

    pub fn with_executor(mut self, executor: Arc<dyn TestExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Context handed to every test instance
    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn build(self) -> TestRunnerService {
        let registry: Arc<dyn TestRegistry> = match self.registry {
            Some(registry) => registry,
            None => Arc::new(InMemoryTestRegistry::new()),
        };
        let policy: Arc<dyn PolicyGate> = match self.policy {
            Some(policy) => policy,
            None => Arc::new(FlagPolicyGate::new(self.config.policy)),
        };
        let executor: Arc<dyn TestExecutor> = match self.executor {
            Some(executor) => executor,
            None => Arc::new(SuiteExecutor::new()),
        };
        let context = self
            .context
            .unwrap_or_else(|| ExecutionContext::new(self.config.execution.context_name.clone()));

        let dispatcher = Dispatcher::new(registry.clone(), policy.clone(), executor)
            .with_context(context)
            .with_max_concurrent(self.config.execution.max_concurrent_classes);

        TestRunnerService {
            registry,
            policy,
            dispatcher: Arc::new(dispatcher),
        }
    }
}
