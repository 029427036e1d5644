//! Thumbnail pipeline error types.

use thiserror::Error;

use super::{CodecError, HostError, RenderError, StoreError};
use crate::domain::entities::SourceImageId;

/// Result type for thumbnail operations.
pub type ThumbnailResult<T> = Result<T, ThumbnailError>;

/// Failures that abort a thumbnail regeneration.
///
/// None of these are fatal: the previous artifact stays in place and the next
/// save or self-healing read retries.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ThumbnailError {
    #[error("source image {source_id} has no readable file")]
    SourceUnavailable { source_id: SourceImageId },

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("encoding failed: {0}")]
    Codec(#[from] CodecError),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),

    #[error("host error: {0}")]
    Host(#[from] HostError),

    #[error("cannot serialize settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ThumbnailError {
    /// Creates source unavailable error.
    #[must_use]
    pub const fn source_unavailable(source_id: SourceImageId) -> Self {
        Self::SourceUnavailable { source_id }
    }

    /// Returns true if a later attempt may succeed without intervention.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Host(_) | Self::Io(_))
    }
}
