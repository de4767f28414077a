//! Log settings stored alongside the service configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling::Rotation;

/// Filter used when none is configured
pub const DEFAULT_FILTER: &str = "info";

/// How events are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per event, including the current span's fields
    Json,
}

/// When the log file starts over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Where `thumbnail-keeper.log` is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLogSettings {
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,

    #[serde(default)]
    pub rotation: LogRotation,
}

impl Default for FileLogSettings {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            rotation: LogRotation::default(),
        }
    }
}

/// The `logging` section of a thumbnail configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directives, e.g. `warn,thumbnail_keeper=debug`
    pub filter: String,
    pub format: LogFormat,
    /// Write events to stderr
    pub console: bool,
    /// Also write events to a rolling file
    pub file: Option<FileLogSettings>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Text,
            console: true,
            file: None,
        }
    }
}

impl LogSettings {
    /// Every conversion step of this crate at debug level
    pub fn verbose() -> Self {
        Self {
            filter: "info,thumbnail_keeper=debug".to_string(),
            ..Self::default()
        }
    }

    /// JSON events on stderr and in a daily log file
    pub fn service() -> Self {
        Self {
            format: LogFormat::Json,
            file: Some(FileLogSettings::default()),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_file(mut self, directory: impl Into<PathBuf>, rotation: LogRotation) -> Self {
        self.file = Some(FileLogSettings {
            directory: directory.into(),
            rotation,
        });
        self
    }
}

fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("thumbnail-keeper").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
