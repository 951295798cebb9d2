//! Error types for image operations.

use thiserror::Error;

/// Error type for image operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Region, shape or format error raised by the core buffer types.
    #[error(transparent)]
    Core(#[from] pixmill_core::Error),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl OpsError {
    /// Returns `true` if this wraps an out-of-range region error.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_bounds_error())
    }
}

/// Result type for image operations.
pub type OpsResult<T> = Result<T, OpsError>;
