//! Configuration Storage Implementation
//!
//! Provides JSON file-based configuration storage with:
//! - Atomic writes using temp file + rename
//! - Serde defaults for every optional field

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::logging::{self, LogSettings};

/// Default conversion timeout (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Image types accepted when none are configured
pub const DEFAULT_IMAGE_TYPES: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Thumbnail service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory holding the original pictures
    pub originals_root: PathBuf,

    /// Directory the thumbnails are written to
    pub thumbnails_root: PathBuf,

    /// Image type suffixes to accept, without the leading dot
    #[serde(default = "default_image_types")]
    pub supported_image_types: Vec<String>,

    /// External conversion tool settings
    #[serde(default)]
    pub converter: ConverterConfig,

    /// Subscriber settings for [`logging::install`]
    #[serde(default)]
    pub logging: LogSettings,
}

fn default_image_types() -> Vec<String> {
    DEFAULT_IMAGE_TYPES.iter().map(|t| t.to_string()).collect()
}

impl ServiceConfig {
    /// Create a configuration with default image types and converter
    pub fn new(originals_root: impl Into<PathBuf>, thumbnails_root: impl Into<PathBuf>) -> Self {
        Self {
            originals_root: originals_root.into(),
            thumbnails_root: thumbnails_root.into(),
            supported_image_types: default_image_types(),
            converter: ConverterConfig::default(),
            logging: LogSettings::default(),
        }
    }

    /// Replace the supported image types
    pub fn with_image_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_image_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the converter settings
    pub fn with_converter(mut self, converter: ConverterConfig) -> Self {
        self.converter = converter;
        self
    }

    /// Replace the log settings
    pub fn with_logging(mut self, logging: LogSettings) -> Self {
        self.logging = logging;
        self
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |reason: String| -> ConfigResult<()> { Err(ConfigError::Invalid(reason)) };

        if self.originals_root.as_os_str().is_empty() {
            return invalid("provide originals_root".to_string());
        }
        if self.thumbnails_root.as_os_str().is_empty() {
            return invalid("provide thumbnails_root".to_string());
        }
        if self.supported_image_types.is_empty() {
            return invalid("supported image types must not be empty".to_string());
        }
        if let Some(bad) = self
            .supported_image_types
            .iter()
            .find(|t| t.trim_start_matches('.').is_empty())
        {
            return invalid(format!("invalid image type: {:?}", bad));
        }
        if self.converter.program.is_empty() {
            return invalid("converter.program is empty".to_string());
        }
        if self.converter.timeout_ms == 0 {
            return invalid("converter.timeout_ms must be positive".to_string());
        }
        if let Err(e) = logging::parse_filter(&self.logging.filter) {
            return invalid(format!("logging.filter: {}", e));
        }
        Ok(())
    }
}

/// External conversion tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Program name resolved through `PATH`, or an explicit path
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the conversion arguments (`convert` for `gm`)
    #[serde(default = "default_leading_args")]
    pub leading_args: Vec<String>,

    /// Wall-clock limit for one conversion
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Package name shown when the program is missing
    #[serde(default = "default_package")]
    pub package: String,
}

fn default_program() -> String {
    "gm".to_string()
}

fn default_leading_args() -> Vec<String> {
    vec!["convert".to_string()]
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_package() -> String {
    "GraphicsMagick".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self::graphics_magick()
    }
}

impl ConverterConfig {
    /// GraphicsMagick: `gm convert ...`
    pub fn graphics_magick() -> Self {
        Self {
            program: default_program(),
            leading_args: default_leading_args(),
            timeout_ms: default_timeout_ms(),
            package: default_package(),
        }
    }

    /// ImageMagick 6: `convert ...`
    pub fn image_magick() -> Self {
        Self {
            program: "convert".to_string(),
            leading_args: Vec::new(),
            timeout_ms: default_timeout_ms(),
            package: "ImageMagick".to_string(),
        }
    }

    /// Set the conversion timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Conversion timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Loads and saves a [`ServiceConfig`] as JSON
pub struct ConfigStore;

impl ConfigStore {
    /// Load configuration from file
    pub async fn load(path: &Path) -> ConfigResult<ServiceConfig> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let config: ServiceConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, writing `default` first when the file is missing
    pub async fn load_or_create(path: &Path, default: ServiceConfig) -> ConfigResult<ServiceConfig> {
        match Self::load(path).await {
            Err(ConfigError::NotFound(_)) => {
                Self::save(path, &default).await?;
                Ok(default)
            }
            other => other,
        }
    }

    /// Save configuration to file with atomic write
    pub async fn save(path: &Path, config: &ServiceConfig) -> ConfigResult<()> {
        config.validate()?;
        let content = serde_json::to_string_pretty(config)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to temp file first
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await?;

        // Atomic rename
        tokio::fs::rename(&temp_path, path).await?;

        tracing::debug!("Saved thumbnail configuration to {}", path.display());
        Ok(())
    }
}
