//! Validation errors for malformed test runner input

use thiserror::Error;

/// Errors raised when a caller passes malformed arguments.
///
/// All variants belong to the "invalid argument" family: they are always
/// propagated to the caller and never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid testsId, cannot be null or zero length")]
    EmptyTestsId,

    #[error("Invalid testsType, cannot be null or zero length")]
    EmptyTestsType,

    #[error("Invalid test runner parameter: {0}")]
    UnknownTestsType(String),
}

/// Result type for validation
pub type Result<T> = std::result::Result<T, ValidationError>;
