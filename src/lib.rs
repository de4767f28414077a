//! thumbnail-keeper - on-demand thumbnails backed by GraphicsMagick
//!
//! Given an original image name and a width and/or height, the
//! [`ThumbnailService`] returns the matching thumbnail file, running the
//! external conversion tool only when the thumbnail is missing or older than
//! the original.
//!
//! ```no_run
//! # async fn demo() -> thumbnail_keeper::Result<()> {
//! use thumbnail_keeper::ThumbnailService;
//!
//! let service = ThumbnailService::new("/srv/originals", "/srv/thumbnails", None)?;
//! let thumb = service.ensure_thumbnail("photo.jpg", Some(16), Some(16)).await?;
//! assert_eq!(thumb.key, "photo-16x16.jpg");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod logging;
pub mod thumbnail;

// Re-export commonly used items
pub use config::{ConfigStore, ConverterConfig, ServiceConfig};
pub use crate::core::error::{ErrorRecovery, RecoveryAction, Result, ThumbnailError};
pub use crate::core::runtime::{RuntimeDependencies, ToolStatus};
pub use thumbnail::{
    ConversionJob, Dimensions, EnsuredThumbnail, ProcessConverter, ThumbnailConverter,
    ThumbnailService,
};
pub use tokio_util::sync::CancellationToken;
