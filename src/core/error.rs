//! Error types for scenecore

use thiserror::Error;

/// Main error type for the scene core
#[derive(Debug, Error)]
pub enum Error {
    /// The operation is defined, but not for the value it was called on
    /// (e.g. merging a vertex group that is not a subset).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The capability is permanently absent for this variant.
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Structural misuse or an out-of-range request.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// True for the permanent capability gaps of a vertex group variant.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Error::NotSupported(_))
    }
}
