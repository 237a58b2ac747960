use std::io;
use std::path::PathBuf;

/// Errors raised while building a [`Caltech`](crate::Caltech) dataset.
///
/// Construction is all-or-nothing: the first index-file or decode failure
/// aborts the whole eager pass. There is no partial dataset to recover.
#[derive(Debug, thiserror::Error)]
pub enum CaltechError {
    /// The split index file could not be opened or read.
    #[error("failed to read split index {}: {}", .path.display(), .source)]
    IndexFile { path: PathBuf, source: io::Error },

    /// An image referenced by the index file could not be decoded.
    #[error("failed to decode image {}: {}", .path.display(), .source)]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Convenience Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CaltechError>;
