//! Thumbnail request validation and key derivation

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::core::error::{Result, ThumbnailError};

/// Requested thumbnail size; at least one side is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: Option<u32>,
    height: Option<u32>,
}

impl Dimensions {
    /// Build from optional sides. Zero counts as not supplied.
    pub fn new(width: Option<u32>, height: Option<u32>) -> Result<Self> {
        let width = width.filter(|w| *w > 0);
        let height = height.filter(|h| *h > 0);

        if width.is_none() && height.is_none() {
            return Err(ThumbnailError::invalid("provide width and/or height"));
        }

        Ok(Self { width, height })
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    /// Both sides given: the thumbnail is cropped to exactly this size
    pub fn is_exact(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = self.width {
            write!(f, "{}", width)?;
        }
        if let Some(height) = self.height {
            write!(f, "x{}", height)?;
        }
        Ok(())
    }
}

/// Lower-cased, dot-prefixed extensions accepted by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedExtensions(HashSet<String>);

impl SupportedExtensions {
    /// Build from type suffixes such as `png` or `.JPG`
    pub fn from_types<S: AsRef<str>>(types: &[S]) -> Result<Self> {
        if types.is_empty() {
            return Err(ThumbnailError::invalid(
                "supported image types must not be empty",
            ));
        }

        let mut extensions = HashSet::with_capacity(types.len());
        for image_type in types {
            let suffix = image_type.as_ref().trim_start_matches('.');
            if suffix.is_empty() {
                return Err(ThumbnailError::invalid(format!(
                    "invalid image type: {:?}",
                    image_type.as_ref()
                )));
            }
            extensions.insert(format!(".{}", suffix.to_lowercase()));
        }

        Ok(Self(extensions))
    }

    /// Check an extension without its dot, ignoring case
    pub fn contains(&self, extension: &str) -> bool {
        self.0.contains(&format!(".{}", extension.to_lowercase()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A validated request for one thumbnail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    filename: String,
    dimensions: Dimensions,
    key: String,
}

impl ThumbnailRequest {
    /// Validate the caller's input. Touches no filesystem state.
    pub fn new(
        filename: &str,
        width: Option<u32>,
        height: Option<u32>,
        extensions: &SupportedExtensions,
    ) -> Result<Self> {
        if filename.is_empty() {
            return Err(ThumbnailError::invalid("provide filename"));
        }

        let dimensions = Dimensions::new(width, height)?;

        if filename.chars().any(std::path::is_separator) {
            return Err(ThumbnailError::invalid("filename contains a path"));
        }

        let path = Path::new(filename);
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| extensions.contains(e))
            .ok_or_else(|| ThumbnailError::invalid("image type not supported"))?;
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ThumbnailError::invalid("image type not supported"))?;

        let key = format!("{}-{}.{}", stem, dimensions, extension);

        Ok(Self {
            filename: filename.to_string(),
            dimensions,
            key,
        })
    }

    /// Original file name
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Thumbnail file name: `{stem}-{dims}{extension}`
    pub fn key(&self) -> &str {
        &self.key
    }
}
