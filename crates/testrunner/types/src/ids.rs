//! Identifier for a group of registered test classes

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied key grouping one or more test classes.
///
/// The value is opaque to the test runner: it could be a user id, a session
/// id or something generated. The only rule is that it is not empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TestsId(String);

impl TestsId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::EmptyTestsId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TestsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TestsId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TestsId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TestsId> for String {
    fn from(id: TestsId) -> Self {
        id.0
    }
}

impl AsRef<str> for TestsId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
