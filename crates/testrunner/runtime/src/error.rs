//! Error types for the test runner runtime

use testrunner_registry::RegistryError;
use testrunner_types::ValidationError;
use thiserror::Error;

/// Infrastructure failures of the execution primitive.
///
/// These mean a test class could not be run at all; failing or erroring
/// test methods are reported inside the run result instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("Failure attempting to create test object for {class}: {reason}")]
    Instantiation { class: String, reason: String },

    #[error("Test worker for {class} did not complete: {reason}")]
    WorkerFailed { class: String, reason: String },
}

impl ExecutionError {
    /// Short kind label used in synthetic run results
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionError::Instantiation { .. } => "InstantiationFailed",
            ExecutionError::WorkerFailed { .. } => "WorkerFailed",
        }
    }
}

/// Errors surfaced by the test runner service
#[derive(Debug, Error)]
pub enum TestRunnerError {
    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Test failed for {class} (details in log): {summary}")]
    TestsFailed { class: String, summary: String },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl TestRunnerError {
    /// True for every malformed-input error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            TestRunnerError::InvalidArgument(_) | TestRunnerError::Registry(_)
        )
    }
}

/// Result type for test runner operations
pub type Result<T> = std::result::Result<T, TestRunnerError>;
