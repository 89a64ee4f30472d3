use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by editor operations.
///
/// Every variant is recoverable: an operation that fails leaves the shapes,
/// the in-progress points and the selection exactly as they were.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Need at least 3 points (have {count})")]
    InsufficientPoints { count: usize },

    #[error("Select a shape first")]
    NoSelection,

    #[error("Not in drawing mode")]
    NotDrawing,

    #[error("No image loaded")]
    NoImage,

    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("Failed to read image {}: {source}", path.display())]
    ImageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Invalid base64 image data: {0}")]
    DataUrl(#[from] base64::DecodeError),

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Image load was cancelled before completion")]
    LoadCancelled,
}

impl EditorError {
    /// True for errors the user caused through the toolbar and should be told about.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPoints { .. } | Self::NoSelection | Self::NoImage
        )
    }
}

pub type EditorResult<T> = Result<T, EditorError>;
