//! Payload codec error types.

use thiserror::Error;

/// Errors raised while turning a stored payload back into image bytes.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CodecError {
    #[error("failed to inflate payload: {0}")]
    Inflate(#[source] std::io::Error),

    #[error("failed to deflate payload: {0}")]
    Deflate(#[source] std::io::Error),

    #[error("payload is not valid UTF-8")]
    NotUtf8,

    #[error("malformed data URI: {reason}")]
    MalformedDataUri { reason: String },

    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl CodecError {
    /// Creates malformed data URI error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDataUri {
            reason: reason.into(),
        }
    }
}
