//! Sample test classes shared by the scenario tests

#![allow(dead_code)]

use std::sync::Arc;
use testrunner_policy::PolicyConfig;
use testrunner_runtime::{TestRunnerConfig, TestRunnerService};
use testrunner_types::{
    ExecutionContext, InstantiationError, TestClass, TestClassRef, TestInstance, TestOutcome,
};

pub const TESTS_ID1: &str = "tests-id-1";
pub const TESTS_ID2: &str = "tests-id-2";
pub const TESTS_ID3: &str = "tests-id-3";
pub const TESTS_ID4: &str = "tests-id-4-unreg";
pub const TESTS_ID_INVALID: &str = "tests-id-invalid-xxxxxxxxxxxxx";
pub const TESTS_TYPE_INVALID: &str = "tests-type-invalid-xxxxxxxxxxxxx";

pub const INTEGRATION: &str = "testrunner.integration";
pub const LOAD: &str = "testrunner.load";
pub const VALIDATION: &str = "testrunner.validation";

/// A sample class: fixed name, fixed methods, one instance type
#[derive(Debug)]
struct Sample {
    name: &'static str,
    methods: &'static [&'static str],
    build: fn() -> Box<dyn TestInstance>,
}

impl TestClass for Sample {
    fn name(&self) -> &str {
        self.name
    }

    fn test_methods(&self) -> Vec<String> {
        self.methods.iter().map(|m| m.to_string()).collect()
    }

    fn instantiate(&self) -> Result<Box<dyn TestInstance>, InstantiationError> {
        Ok((self.build)())
    }
}

fn check(condition: bool, message: &str) -> TestOutcome {
    if condition {
        TestOutcome::Passed
    } else {
        TestOutcome::failed(message)
    }
}

fn no_such_method(method: &str) -> TestOutcome {
    TestOutcome::errored("NoSuchMethod", method)
}

/// Three passing methods, one of which needs setup to have happened
#[derive(Default)]
struct One {
    set_up: bool,
}

impl TestInstance for One {
    fn inject(&mut self, _context: &ExecutionContext) {
        self.set_up = true;
    }

    fn run_test(&mut self, method: &str) -> TestOutcome {
        match method {
            "test_check_one" => check(1 == 1, "1 == 1"),
            "test_check_two" => check(1 != 2, "1 != 2"),
            "test_check_setup" => check(self.set_up, "setup did not run"),
            other => no_such_method(other),
        }
    }
}

/// One passing method, one failing check
struct Two;

impl TestInstance for Two {
    fn run_test(&mut self, method: &str) -> TestOutcome {
        match method {
            "test_safe_check" => TestOutcome::Passed,
            "test_cause_failure" => check(false, "expected false to be true"),
            other => no_such_method(other),
        }
    }
}

/// One passing method, one that panics on an out of bounds index
struct Three {
    values: Vec<String>,
}

impl TestInstance for Three {
    fn run_test(&mut self, method: &str) -> TestOutcome {
        match method {
            "test_check_array" => check(self.values[0] == "0", "first value"),
            "test_cause_error" => check(self.values[2] == "2", "third value"),
            other => no_such_method(other),
        }
    }
}

/// Single passing method
struct Pass;

impl TestInstance for Pass {
    fn run_test(&mut self, method: &str) -> TestOutcome {
        match method {
            "test_safe_check" => TestOutcome::Passed,
            other => no_such_method(other),
        }
    }
}

pub fn sample_one() -> TestClassRef {
    TestClassRef::new(Sample {
        name: "samples.SampleTestOne",
        methods: &["test_check_one", "test_check_two", "test_check_setup"],
        build: || Box::new(One::default()),
    })
}

pub fn sample_two() -> TestClassRef {
    TestClassRef::new(Sample {
        name: "samples.SampleTestTwo",
        methods: &["test_safe_check", "test_cause_failure"],
        build: || Box::new(Two),
    })
}

pub fn sample_three() -> TestClassRef {
    TestClassRef::new(Sample {
        name: "samples.SampleTestThree",
        methods: &["test_check_array", "test_cause_error"],
        build: || {
            Box::new(Three {
                values: vec!["0".to_string(), "1".to_string()],
            })
        },
    })
}

pub fn sample_four() -> TestClassRef {
    TestClassRef::new(Sample {
        name: "samples.SampleTestFour",
        methods: &["test_safe_check"],
        build: || Box::new(Pass),
    })
}

pub fn sample_five() -> TestClassRef {
    TestClassRef::new(Sample {
        name: "samples.SampleTestFive",
        methods: &["test_safe_check"],
        build: || Box::new(Pass),
    })
}

/// A class exposing no test methods at all
pub fn empty_suite() -> TestClassRef {
    TestClassRef::new(Sample {
        name: "samples.EmptySuite",
        methods: &[],
        build: || Box::new(Pass),
    })
}

#[derive(Debug)]
struct Unbuildable;

impl TestClass for Unbuildable {
    fn name(&self) -> &str {
        "samples.Unbuildable"
    }

    fn test_methods(&self) -> Vec<String> {
        vec!["test_safe_check".to_string()]
    }

    fn instantiate(&self) -> Result<Box<dyn TestInstance>, InstantiationError> {
        Err("no usable constructor".into())
    }
}

/// A class whose instances can never be built
pub fn unbuildable() -> TestClassRef {
    TestClassRef::new(Unbuildable)
}

/// Service seeded like the classic fixture:
/// - id1 integration {One, Five}
/// - id2 load {Two}
/// - id3 load {Three}
pub fn seeded_service(policy: PolicyConfig) -> Arc<TestRunnerService> {
    let service = TestRunnerService::new(TestRunnerConfig {
        policy,
        ..TestRunnerConfig::default()
    });
    service
        .register_tests(TESTS_ID1, INTEGRATION, vec![sample_one(), sample_five()])
        .unwrap();
    service.register_test(TESTS_ID2, LOAD, sample_two()).unwrap();
    service.register_test(TESTS_ID3, LOAD, sample_three()).unwrap();
    Arc::new(service)
}

pub fn names(classes: &[TestClassRef]) -> Vec<&str> {
    let mut names: Vec<_> = classes.iter().map(|c| c.name()).collect();
    names.sort();
    names
}
