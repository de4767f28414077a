//! On-demand Thumbnail Generation
//!
//! `ThumbnailService` returns the name of a thumbnail for an original image,
//! running the external conversion tool only when the thumbnail is missing
//! or older than the original.
//!
//! Each call goes through the same steps:
//! validate the request, stat the original, stat the thumbnail, then either
//! return the cached thumbnail or convert.

mod converter;
mod request;

pub use converter::{ConversionJob, ProcessConverter, ThumbnailConverter};
pub use request::{Dimensions, SupportedExtensions, ThumbnailRequest};

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigError, ServiceConfig};
use crate::core::error::{Result, ThumbnailError};
use crate::core::runtime::{RuntimeDependencies, ToolStatus};

/// Outcome of [`ThumbnailService::ensure_thumbnail`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredThumbnail {
    /// Thumbnail file name inside the thumbnails root
    pub key: String,
    /// Full path of the thumbnail
    pub path: PathBuf,
    /// Whether the converter ran during this call
    pub created: bool,
}

/// Thumbnail service over an originals and a thumbnails directory
pub struct ThumbnailService {
    config: ServiceConfig,
    extensions: SupportedExtensions,
    converter: Box<dyn ThumbnailConverter>,
}

impl ThumbnailService {
    /// Create a service. `supported_image_types` defaults to
    /// `png, jpg, jpeg, gif`.
    pub fn new(
        originals_root: impl Into<PathBuf>,
        thumbnails_root: impl Into<PathBuf>,
        supported_image_types: Option<Vec<String>>,
    ) -> Result<Self> {
        let mut config = ServiceConfig::new(originals_root, thumbnails_root);
        if let Some(types) = supported_image_types {
            config.supported_image_types = types;
        }
        Self::from_config(config)
    }

    /// Create a service from a loaded configuration
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        config.validate().map_err(|e| match e {
            ConfigError::Invalid(reason) => ThumbnailError::invalid(reason),
            other => ThumbnailError::invalid(other.to_string()),
        })?;

        let extensions = SupportedExtensions::from_types(&config.supported_image_types)?;
        let converter = Box::new(ProcessConverter::new(config.converter.clone()));

        Ok(Self {
            config,
            extensions,
            converter,
        })
    }

    /// Replace the process-backed converter
    pub fn with_converter(mut self, converter: impl ThumbnailConverter + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    /// Return the thumbnail for `filename`, generating it when absent or stale
    pub async fn ensure_thumbnail(
        &self,
        filename: &str,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<EnsuredThumbnail> {
        let request = ThumbnailRequest::new(filename, width, height, &self.extensions)?;
        self.ensure(&request).await
    }

    /// Same as [`ensure_thumbnail`](Self::ensure_thumbnail), abandoning the
    /// call with [`ThumbnailError::Cancelled`] once `token` fires. A running
    /// conversion process is killed.
    pub async fn ensure_thumbnail_with_cancel(
        &self,
        filename: &str,
        width: Option<u32>,
        height: Option<u32>,
        token: &CancellationToken,
    ) -> Result<EnsuredThumbnail> {
        let request = ThumbnailRequest::new(filename, width, height, &self.extensions)?;

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(filename, "Thumbnail request cancelled");
                Err(ThumbnailError::Cancelled)
            }
            result = self.ensure(&request) => result,
        }
    }

    #[instrument(
        name = "ensure_thumbnail",
        skip(self, request),
        fields(filename = %request.filename(), dims = %request.dimensions())
    )]
    async fn ensure(&self, request: &ThumbnailRequest) -> Result<EnsuredThumbnail> {
        let original_path = self.config.originals_root.join(request.filename());
        let thumbnail_path = self.thumbnail_path(request.key());

        let original = tokio::fs::metadata(&original_path)
            .await
            .map_err(|source| ThumbnailError::NotFound {
                path: original_path.clone(),
                source,
            })?;
        let original_mtime = original.modified().map_err(|source| ThumbnailError::Io {
            path: original_path.clone(),
            source,
        })?;

        match tokio::fs::metadata(&thumbnail_path).await {
            Ok(thumbnail) => {
                let thumbnail_mtime = thumbnail.modified().map_err(|source| ThumbnailError::Io {
                    path: thumbnail_path.clone(),
                    source,
                })?;

                if original_mtime < thumbnail_mtime {
                    debug!(key = request.key(), "Thumbnail is up to date");
                    return Ok(EnsuredThumbnail {
                        key: request.key().to_string(),
                        path: thumbnail_path,
                        created: false,
                    });
                }
                debug!(key = request.key(), "Original is newer than thumbnail");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = request.key(), "Thumbnail does not exist yet");
            }
            Err(source) => {
                return Err(ThumbnailError::Io {
                    path: thumbnail_path,
                    source,
                });
            }
        }

        let job = ConversionJob {
            source: original_path,
            target: thumbnail_path,
            dimensions: request.dimensions(),
        };

        let start = Instant::now();
        if let Err(e) = self.converter.convert(&job).await {
            warn!(converter = self.converter.name(), error = %e, "Thumbnail conversion failed");
            return Err(e);
        }

        info!(
            key = request.key(),
            converter = self.converter.name(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Thumbnail generated"
        );

        Ok(EnsuredThumbnail {
            key: request.key().to_string(),
            path: job.target,
            created: true,
        })
    }

    /// Where the thumbnail with `key` lives
    pub fn thumbnail_path(&self, key: &str) -> PathBuf {
        self.config.thumbnails_root.join(key)
    }

    /// Check whether the configured conversion tool can be found
    pub fn check_converter(&self) -> ToolStatus {
        RuntimeDependencies::check_converter(&self.config.converter)
    }

    pub fn originals_root(&self) -> &Path {
        &self.config.originals_root
    }

    pub fn thumbnails_root(&self) -> &Path {
        &self.config.thumbnails_root
    }

    /// Image types as configured
    pub fn supported_image_types(&self) -> &[String] {
        &self.config.supported_image_types
    }

    pub fn supported_extensions(&self) -> &SupportedExtensions {
        &self.extensions
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
