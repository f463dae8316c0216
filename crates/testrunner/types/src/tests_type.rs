//! Test categories
//!
//! Every registered tests id belongs to exactly one category, and each
//! category can be switched on or off independently.

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of a group of tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestsType {
    /// Integration tests, run against the live framework (default: on)
    Integration,

    /// Load tests; costly, meant for benchmarking a new setup (default: off)
    Load,

    /// Data validation tests; costly, meant for after migrations (default: off)
    Validation,
}

impl TestsType {
    /// Parameter key for integration tests
    pub const INTEGRATION_PARAM: &'static str = "testrunner.integration";
    /// Parameter key for load tests
    pub const LOAD_PARAM: &'static str = "testrunner.load";
    /// Parameter key for data validation tests
    pub const VALIDATION_PARAM: &'static str = "testrunner.validation";

    /// All test types, in declaration order
    pub const ALL: [TestsType; 3] = [
        TestsType::Integration,
        TestsType::Load,
        TestsType::Validation,
    ];

    /// The configuration parameter key for this type
    pub fn param(&self) -> &'static str {
        match self {
            TestsType::Integration => Self::INTEGRATION_PARAM,
            TestsType::Load => Self::LOAD_PARAM,
            TestsType::Validation => Self::VALIDATION_PARAM,
        }
    }

    /// Short lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            TestsType::Integration => "integration",
            TestsType::Load => "load",
            TestsType::Validation => "validation",
        }
    }

    /// Parse a caller-supplied type string.
    ///
    /// Accepts the parameter keys (`testrunner.load`) and the short names
    /// (`load`). Empty input and anything else are invalid arguments.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "" => Err(ValidationError::EmptyTestsType),
            Self::INTEGRATION_PARAM | "integration" => Ok(TestsType::Integration),
            Self::LOAD_PARAM | "load" => Ok(TestsType::Load),
            Self::VALIDATION_PARAM | "validation" => Ok(TestsType::Validation),
            other => Err(ValidationError::UnknownTestsType(other.to_string())),
        }
    }
}

impl fmt::Display for TestsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

impl FromStr for TestsType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
