//! Registry error types

use testrunner_types::{TestsId, ValidationError};
use thiserror::Error;

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),

    #[error("No test classes supplied for testsId: {0}")]
    EmptyRegistration(TestsId),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
