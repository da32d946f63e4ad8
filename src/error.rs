use std::fmt;

/// Reasons a media collection is refused when the viewer is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryError {
    /// No items were provided.
    EmptyCollection,
    /// More than one item, and at least one of them is a video.
    UnsupportedMultiVideo,
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryError::EmptyCollection => write!(f, "images are not provided"),
            GalleryError::UnsupportedMultiVideo => {
                write!(f, "gallery mode does not support video files")
            }
        }
    }
}

impl std::error::Error for GalleryError {}

#[derive(Debug)]
pub enum ManifestError {
    Io(String),
    Parse(String),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::Io(e) => write!(f, "I/O Error: {}", e),
            ManifestError::Parse(e) => write!(f, "Manifest Error: {}", e),
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<std::io::Error> for ManifestError {
    fn from(err: std::io::Error) -> Self {
        ManifestError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ManifestError {
    fn from(err: toml::de::Error) -> Self {
        ManifestError::Parse(err.to_string())
    }
}
