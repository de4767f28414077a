//! Runtime dependencies management
//!
//! Checks whether the external conversion tool can be found before the
//! first thumbnail is requested.

use std::path::PathBuf;

use crate::config::ConverterConfig;

/// Runtime dependencies checker
pub struct RuntimeDependencies;

/// Conversion tool availability status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    /// Whether the program was found
    pub available: bool,
    /// Program as configured
    pub program: String,
    /// Package that provides the program
    pub package: String,
    /// Where the program was found
    pub resolved_path: Option<PathBuf>,
}

impl RuntimeDependencies {
    /// Check that the configured conversion program exists
    pub fn check_converter(config: &ConverterConfig) -> ToolStatus {
        let resolved_path = Self::find_program(&config.program);
        ToolStatus {
            available: resolved_path.is_some(),
            program: config.program.clone(),
            package: config.package.clone(),
            resolved_path,
        }
    }

    /// Resolve a program name through PATH, honouring the executable bit
    /// on Unix and `PATHEXT` on Windows
    fn find_program(program: &str) -> Option<PathBuf> {
        if program.is_empty() {
            return None;
        }

        match which::which(program) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!(program, error = %e, "Conversion program not found");
                None
            }
        }
    }
}
