//! Declarative registration of a single test class
//!
//! A component that owns a test class describes how it should be handled
//! (registered for later runs, run at startup, or both) and hands the
//! description to [`TestRegistration::activate`]. The matching
//! [`TestRegistration::deactivate`] removes the registration again when
//! the component goes away.

use crate::error::Result;
use crate::service::TestRunnerService;
use chrono::Utc;
use std::sync::Arc;
use testrunner_types::{TestClassRef, TestsId, TestsType};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// What activation did about running the class
#[derive(Debug)]
pub enum Activation {
    /// No run requested, or the type is disabled
    NotRun,

    /// Ran immediately and passed; holds the summary line
    Passed(String),

    /// Will run once the delay has elapsed
    Scheduled(JoinHandle<Result<String>>),
}

/// How one test class is registered and run
#[derive(Debug, Clone)]
pub struct TestRegistration {
    class: TestClassRef,
    tests_type: TestsType,
    tests_id: Option<TestsId>,
    register: bool,
    delay_seconds: i64,
}

impl TestRegistration {
    /// Register as a load test under a generated id, never run automatically
    pub fn new(class: TestClassRef) -> Self {
        Self {
            class,
            tests_type: TestsType::Load,
            tests_id: None,
            register: true,
            delay_seconds: -1,
        }
    }

    pub fn with_tests_type(mut self, tests_type: TestsType) -> Self {
        self.tests_type = tests_type;
        self
    }

    pub fn with_tests_id(mut self, tests_id: TestsId) -> Self {
        self.tests_id = Some(tests_id);
        self
    }

    /// Whether to put the class in the registry
    pub fn with_register(mut self, register: bool) -> Self {
        self.register = register;
        self
    }

    /// Run on activation: negative never, zero immediately, positive after that many seconds
    pub fn with_delay_seconds(mut self, delay_seconds: i64) -> Self {
        self.delay_seconds = delay_seconds;
        self
    }

    pub fn class(&self) -> &TestClassRef {
        &self.class
    }

    pub fn tests_type(&self) -> TestsType {
        self.tests_type
    }

    /// Id in use, generated on first activation when none was given
    pub fn tests_id(&self) -> Option<&TestsId> {
        self.tests_id.as_ref()
    }

    /// Register and/or run the class.
    ///
    /// An immediate run that does not pass fails activation with
    /// [`crate::TestRunnerError::TestsFailed`].
    pub async fn activate(&mut self, service: &Arc<TestRunnerService>) -> Result<Activation> {
        let tests_id = match &self.tests_id {
            Some(tests_id) => tests_id.clone(),
            None => {
                let generated = TestsId::new(format!(
                    "{}:{}",
                    self.class.name(),
                    Utc::now().timestamp_millis()
                ))?;
                self.tests_id = Some(generated.clone());
                generated
            }
        };

        if self.register {
            service
                .registry()
                .register_tests(&tests_id, self.tests_type, vec![self.class.clone()])?;
            tracing::debug!(
                tests_id = %tests_id,
                tests_type = %self.tests_type,
                class = %self.class,
                "Registered test class"
            );
        } else if self.delay_seconds < 0 {
            tracing::warn!(
                class = %self.class,
                "Test class is neither registered nor scheduled: it will never run"
            );
        }

        if self.delay_seconds < 0 {
            return Ok(Activation::NotRun);
        }

        if !service.policy().param(self.tests_type) {
            tracing::warn!(
                class = %self.class,
                tests_type = %self.tests_type,
                "Testing is disabled for this type: test class will not be run"
            );
            return Ok(Activation::NotRun);
        }

        if self.delay_seconds == 0 {
            let summary = service.execute_tests(self.class.clone()).await?;
            return Ok(Activation::Passed(summary));
        }

        let delay_secs = self.delay_seconds.unsigned_abs();
        let class = self.class.clone();
        let service = service.clone();
        tracing::info!(class = %class, delay_secs, "Scheduled test class run");

        Ok(Activation::Scheduled(tokio::spawn(async move {
            sleep(Duration::from_secs(delay_secs)).await;
            service.execute_tests(class).await
        })))
    }

    /// Remove the registration made by [`TestRegistration::activate`]
    pub fn deactivate(&self, service: &TestRunnerService) {
        if !self.register {
            return;
        }
        if let Some(tests_id) = &self.tests_id {
            service
                .registry()
                .unregister_tests(Some(tests_id), Some(self.tests_type));
            tracing::debug!(tests_id = %tests_id, "Unregistered test class");
        }
    }
}
