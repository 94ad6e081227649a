//! Error types for the order workflow.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::Material;
use crate::upload::UploadFailure;
use crate::validation::FieldErrors;
use crate::workflow::Step;

/// Error categories surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Model file rejected at selection time.
    FileRejected = 1,
    /// Upload failed in transit or was refused by the server.
    TransportFailure = 2,
    /// Shipping form or order fields failed their constraints.
    ValidationFailure = 3,
    /// Material exists but cannot be ordered yet.
    MaterialUnavailable = 4,
    /// Step cannot be entered in the current state.
    StepLocked = 5,
    /// Configuration could not be loaded.
    Config = 6,
    /// Local file or IO problem.
    Io = 7,
}

/// Main error type for the storefront core.
#[derive(Debug, Error)]
pub enum ShopError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("File '{name}' rejected: {reason}")]
    FileRejected { name: String, reason: String },

    #[error("Upload failed: {0}")]
    Upload(UploadFailure),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Material {0} is not available yet")]
    MaterialUnavailable(Material),

    #[error("Step '{step}' is locked: {reason}")]
    StepLocked { step: Step, reason: String },

    #[error("Invalid value for '{field}': expected {expected}, got '{value}'")]
    InvalidValue {
        field: String,
        expected: String,
        value: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShopError {
    /// Get the error category for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ShopError::FileNotFound { .. } => ErrorCode::Io,
            ShopError::FileRejected { .. } => ErrorCode::FileRejected,
            ShopError::Upload(_) => ErrorCode::TransportFailure,
            ShopError::Validation(_) => ErrorCode::ValidationFailure,
            ShopError::MaterialUnavailable(_) => ErrorCode::MaterialUnavailable,
            ShopError::StepLocked { .. } => ErrorCode::StepLocked,
            ShopError::InvalidValue { .. } => ErrorCode::ValidationFailure,
            ShopError::Config { .. } => ErrorCode::Config,
            ShopError::Io(_) => ErrorCode::Io,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }

    /// Whether the user can recover by retrying or correcting input.
    /// Every error in this crate is recoverable except broken configuration.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self.code(), ErrorCode::Config)
    }
}

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, ShopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = ShopError::FileRejected {
            name: "part.step".into(),
            reason: "unsupported file type".into(),
        };
        assert_eq!(err.code(), ErrorCode::FileRejected);
        assert_eq!(err.code_value(), 1);
        assert!(err.is_recoverable());

        let err = ShopError::MaterialUnavailable(Material::Abs);
        assert_eq!(err.code(), ErrorCode::MaterialUnavailable);
        assert_eq!(err.to_string(), "Material ABS is not available yet");

        let err = ShopError::Config {
            message: "bad".into(),
        };
        assert!(!err.is_recoverable());
    }
}
