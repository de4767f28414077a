//! External conversion tool invocation
//!
//! The resizing itself is delegated to GraphicsMagick (or a compatible
//! tool). A conversion succeeds only when the process exits with status 0
//! and writes nothing to its error stream.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use super::request::Dimensions;
use crate::config::ConverterConfig;
use crate::core::error::{Result, ThumbnailError};

/// Exit status a shell reports for an unknown command
const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// One conversion from an original to a thumbnail file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    /// Original image
    pub source: PathBuf,
    /// Thumbnail to write
    pub target: PathBuf,
    /// Requested size
    pub dimensions: Dimensions,
}

impl ConversionJob {
    /// Conversion arguments, not including the tool's leading arguments.
    ///
    /// The image is scaled to cover the requested size and centered. When
    /// both sides are given it is also cropped to exactly that size.
    /// Embedded profiles are stripped.
    pub fn arguments(&self) -> Vec<OsString> {
        let dims = self.dimensions.to_string();

        let mut args: Vec<OsString> = vec![
            "-size".into(),
            dims.clone().into(),
            self.source.clone().into(),
            "-thumbnail".into(),
            format!("{}^", dims).into(),
            "-gravity".into(),
            "center".into(),
        ];

        if self.dimensions.is_exact() {
            args.push("-extent".into());
            args.push(dims.into());
        }

        args.push("+profile".into());
        args.push("*".into());
        args.push(self.target.clone().into());
        args
    }
}

/// Converter trait so the process-backed tool can be swapped out
#[async_trait]
pub trait ThumbnailConverter: Send + Sync {
    /// Write `job.target` from `job.source`
    async fn convert(&self, job: &ConversionJob) -> Result<()>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Runs the configured program as a child process
#[derive(Debug, Clone)]
pub struct ProcessConverter {
    config: ConverterConfig,
}

impl ProcessConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    fn tool_not_found(&self) -> ThumbnailError {
        ThumbnailError::ToolNotFound {
            program: self.config.program.clone(),
            package: self.config.package.clone(),
        }
    }
}

#[async_trait]
impl ThumbnailConverter for ProcessConverter {
    async fn convert(&self, job: &ConversionJob) -> Result<()> {
        let program = &self.config.program;

        let mut command = Command::new(program);
        command
            .args(&self.config.leading_args)
            .args(job.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(self.tool_not_found());
            }
            Err(e) => {
                return Err(ThumbnailError::conversion(format!(
                    "failed to start {}: {}",
                    program, e
                )));
            }
        };

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.config.timeout(), child.wait_with_output()).await
        {
            Ok(output) => output.map_err(|e| {
                ThumbnailError::conversion(format!("failed to wait for {}: {}", program, e))
            })?,
            Err(_) => {
                return Err(ThumbnailError::conversion(format!(
                    "{} timed out after {}ms",
                    program, self.config.timeout_ms
                )));
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();

        if !output.status.success() {
            if output.status.code() == Some(EXIT_COMMAND_NOT_FOUND) {
                return Err(self.tool_not_found());
            }
            return Err(ThumbnailError::conversion(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr
            )));
        }

        if !stderr.is_empty() {
            return Err(ThumbnailError::conversion(stderr.to_string()));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.config.program
    }
}
