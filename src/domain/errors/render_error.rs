//! Image renderer error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the image renderer.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum RenderError {
    #[error("cannot open source image {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("unsupported image format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to encode thumbnail: {message}")]
    EncodeFailed { message: String },

    #[error("no dominant color found")]
    NoColor,

    #[error("render task failed: {message}")]
    TaskFailed { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Creates unreadable source error.
    #[must_use]
    pub fn unreadable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Unreadable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates encode failed error.
    #[must_use]
    pub fn encode_failed(message: impl Into<String>) -> Self {
        Self::EncodeFailed {
            message: message.into(),
        }
    }
}
