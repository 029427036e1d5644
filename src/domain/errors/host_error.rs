//! Host collaborator error types.

use thiserror::Error;

/// Errors reported by the host's entity, meta, or option storage.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum HostError {
    #[error("failed to read {what}: {message}")]
    ReadFailed { what: String, message: String },

    #[error("failed to write {what}: {message}")]
    WriteFailed { what: String, message: String },
}

impl HostError {
    /// Creates read failed error.
    #[must_use]
    pub fn read_failed(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Creates write failed error.
    #[must_use]
    pub fn write_failed(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            what: what.into(),
            message: message.into(),
        }
    }
}
