//! Error types for thumbnail-keeper
//!
//! Every failure of `ensure_thumbnail` maps onto one variant of
//! [`ThumbnailError`]. Argument errors are raised before any I/O happens.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for thumbnail operations
pub type Result<T> = std::result::Result<T, ThumbnailError>;

/// Main error type for thumbnail operations
#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Original not found: {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{program} not found, make sure {package} is installed and {program} is available in your environment"
    )]
    ToolNotFound { program: String, package: String },

    #[error("Conversion failed: {reason}")]
    ConversionFailed { reason: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl ThumbnailError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ThumbnailError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn conversion(reason: impl Into<String>) -> Self {
        ThumbnailError::ConversionFailed {
            reason: reason.into(),
        }
    }
}

/// Trait for error recovery strategies
pub trait ErrorRecovery {
    /// Check if the error is retryable
    fn is_retryable(&self) -> bool;

    /// Get suggested retry delay in milliseconds
    fn retry_delay_ms(&self) -> Option<u64>;

    /// Get recovery action suggestion
    fn recovery_action(&self) -> RecoveryAction;
}

/// Recovery action suggestions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Retry the operation
    Retry,
    /// Skip this item and continue
    Skip,
    /// Notify user and wait for input
    NotifyUser,
    /// Abort the operation
    Abort,
}

impl ErrorRecovery for ThumbnailError {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            ThumbnailError::Io { .. } | ThumbnailError::ConversionFailed { .. }
        )
    }

    fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            ThumbnailError::Io { .. } => Some(500),
            ThumbnailError::ConversionFailed { .. } => Some(1000),
            _ => None,
        }
    }

    fn recovery_action(&self) -> RecoveryAction {
        match self {
            ThumbnailError::InvalidArgument { .. } => RecoveryAction::Skip,
            ThumbnailError::NotFound { .. } => RecoveryAction::Skip,
            ThumbnailError::ToolNotFound { .. } => RecoveryAction::NotifyUser,
            ThumbnailError::Io { .. } => RecoveryAction::Retry,
            ThumbnailError::ConversionFailed { .. } => RecoveryAction::Retry,
            ThumbnailError::Cancelled => RecoveryAction::Abort,
        }
    }
}
