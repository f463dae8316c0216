//! Test Runner Types - shared vocabulary of the test runner
//!
//! This crate holds the types every other test runner crate speaks:
//!
//! - **TestsId**: caller-chosen key grouping test classes for joint registration
//! - **TestsType**: the closed set of test categories (integration, load, validation)
//! - **TestClass / TestClassRef**: the capability a runnable test unit exposes
//! - **RunResult / RunResultSet**: outcome of executing test classes
//!
//! Nothing here does any work on its own; registration lives in
//! `testrunner-registry`, policy in `testrunner-policy` and execution in
//! `testrunner-runtime`.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod context;
pub mod error;
pub mod ids;
pub mod result;
pub mod test_class;
pub mod tests_type;

// Re-exports
pub use context::ExecutionContext;
pub use error::{Result, ValidationError};
pub use ids::TestsId;
pub use result::{RunResult, RunResultSet, RunTotals, TestFailure};
pub use test_class::{
    FnTestClass, InstantiationError, TestClass, TestClassRef, TestInstance, TestOutcome,
};
pub use tests_type::TestsType;
