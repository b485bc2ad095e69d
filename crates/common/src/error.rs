//! Common error primitives for the foundation crates.

use thiserror::Error;

/// Errors produced by the foundation utilities (crypto, token signing).
///
/// Module-specific errors elsewhere in the workspace compose with this type
/// rather than duplicating its variants.
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommonError {
    /// Build an internal error from any displayable message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Build an invalid-input error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for foundation operations.
pub type CommonResult<T> = std::result::Result<T, CommonError>;
