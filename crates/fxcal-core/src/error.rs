//! Error types for fxcal-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Unparsable number: {0:?}")]
    UnparsableNumber(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
