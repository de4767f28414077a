//! Core Module
//!
//! This module contains:
//! - Error types and recovery hints
//! - Runtime dependency checks for the conversion tool

pub mod error;
pub mod runtime;

// Re-export commonly used items
pub use error::{ErrorRecovery, RecoveryAction, Result, ThumbnailError};
pub use runtime::{RuntimeDependencies, ToolStatus};
