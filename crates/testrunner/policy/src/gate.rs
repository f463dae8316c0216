//! Policy gate trait and the flag-based implementation
//!
//! The dispatcher reads the gate on every run request, while admin tooling
//! may flip switches at any moment, so gates are shared and mutated through
//! `&self`.

use crate::config::PolicyConfig;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use testrunner_types::{Result, TestsType};

/// Policy gate deciding which tests may run
pub trait PolicyGate: Send + Sync + fmt::Debug {
    /// Global switch
    fn is_enabled(&self) -> bool;

    fn set_enabled(&self, enabled: bool);

    /// The stored switch for a type, regardless of the global switch
    fn check_type(&self, tests_type: TestsType) -> bool;

    fn set_type_enabled(&self, tests_type: TestsType, enabled: bool);

    /// Seconds before the automatic startup run (negative = never)
    fn automatic_delay_seconds(&self) -> i64;

    fn set_automatic_delay_seconds(&self, seconds: i64);

    /// Parameter value for a type; always `false` while globally disabled
    fn param(&self, tests_type: TestsType) -> bool {
        self.is_enabled() && self.check_type(tests_type)
    }

    /// [`check_type`](Self::check_type) for a caller-supplied type string
    fn check_type_str(&self, tests_type: &str) -> Result<bool> {
        Ok(self.check_type(TestsType::parse(tests_type)?))
    }

    /// [`param`](Self::param) keyed by parameter string
    fn get_param(&self, parameter: &str) -> Result<bool> {
        Ok(self.param(TestsType::parse(parameter)?))
    }

    /// Set a type switch keyed by parameter string
    fn set_param(&self, parameter: &str, value: bool) -> Result<()> {
        self.set_type_enabled(TestsType::parse(parameter)?, value);
        Ok(())
    }

    /// Current values as a config
    fn snapshot(&self) -> PolicyConfig {
        PolicyConfig {
            enabled: self.is_enabled(),
            test_integration: self.check_type(TestsType::Integration),
            test_load: self.check_type(TestsType::Load),
            test_validity: self.check_type(TestsType::Validation),
            test_delay_seconds: self.automatic_delay_seconds(),
        }
    }
}

/// Policy gate backed by atomic switches
pub struct FlagPolicyGate {
    enabled: AtomicBool,
    integration: AtomicBool,
    load: AtomicBool,
    validation: AtomicBool,
    delay_seconds: AtomicI64,
}

impl FlagPolicyGate {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            enabled: AtomicBool::new(config.enabled),
            integration: AtomicBool::new(config.test_integration),
            load: AtomicBool::new(config.test_load),
            validation: AtomicBool::new(config.test_validity),
            delay_seconds: AtomicI64::new(config.test_delay_seconds),
        }
    }

    fn flag(&self, tests_type: TestsType) -> &AtomicBool {
        match tests_type {
            TestsType::Integration => &self.integration,
            TestsType::Load => &self.load,
            TestsType::Validation => &self.validation,
        }
    }
}

impl Default for FlagPolicyGate {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}

impl fmt::Debug for FlagPolicyGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FlagPolicyGate").field(&self.snapshot()).finish()
    }
}

impl PolicyGate for FlagPolicyGate {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!(enabled = enabled, "Test running switched");
    }

    fn check_type(&self, tests_type: TestsType) -> bool {
        self.flag(tests_type).load(Ordering::SeqCst)
    }

    fn set_type_enabled(&self, tests_type: TestsType, enabled: bool) {
        self.flag(tests_type).store(enabled, Ordering::SeqCst);
        tracing::info!(tests_type = %tests_type, enabled = enabled, "Test type switched");
    }

    fn automatic_delay_seconds(&self) -> i64 {
        self.delay_seconds.load(Ordering::SeqCst)
    }

    fn set_automatic_delay_seconds(&self, seconds: i64) {
        self.delay_seconds.store(seconds, Ordering::SeqCst);
    }
}
