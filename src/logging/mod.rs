//! Subscriber installation for applications embedding the service
//!
//! The library itself only emits `tracing` events. An application that has
//! no subscriber of its own can call [`install`] with the `logging` section
//! of its [`ServiceConfig`](crate::ServiceConfig).

mod settings;


pub use settings::{FileLogSettings, LogFormat, LogRotation, LogSettings, DEFAULT_FILTER};

use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "THUMBNAIL_KEEPER_LOG";

const LOG_FILE_PREFIX: &str = "thumbnail-keeper.log";

/// Registry with the level filter applied; event layers sit on top of it
type Filtered = Layered<EnvFilter, Registry>;
type EventLayer = Box<dyn Layer<Filtered> + Send + Sync>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to create log directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInstalled(String),
}

/// Keeps the file writer running; events still buffered are flushed on drop
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    file: Option<WorkerGuard>,
}

impl LogGuard {
    pub fn writes_file(&self) -> bool {
        self.file.is_some()
    }
}

/// Parse `EnvFilter` directives
pub fn parse_filter(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global subscriber described by `settings`.
///
/// A non-empty `THUMBNAIL_KEEPER_LOG` replaces `settings.filter`.
pub fn install(settings: &LogSettings) -> Result<LogGuard, LoggingError> {
    let directives = std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| settings.filter.clone());
    let filter = parse_filter(&directives)?;

    let mut layers: Vec<EventLayer> = Vec::new();
    if settings.console {
        layers.push(event_layer(settings.format, std::io::stderr, true));
    }

    let mut file_guard = None;
    if let Some(file) = &settings.file {
        std::fs::create_dir_all(&file.directory).map_err(|source| LoggingError::Directory {
            path: file.directory.clone(),
            source,
        })?;
        let appender =
            RollingFileAppender::new(file.rotation.into(), &file.directory, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(event_layer(settings.format, writer, false));
        file_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))?;

    tracing::debug!(filter = %directives, format = ?settings.format, "Logging installed");

    Ok(LogGuard { file: file_guard })
}

fn event_layer<W>(format: LogFormat, writer: W, ansi: bool) -> EventLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    match format {
        LogFormat::Text => layer.boxed(),
        LogFormat::Json => layer.json().with_current_span(true).boxed(),
    }
}
