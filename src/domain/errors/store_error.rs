//! Artifact store error types.

use thiserror::Error;

use super::HostError;

/// Errors raised by artifact store backends.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("binary payloads cannot be stored as entity metadata")]
    BinaryUnsupported,

    #[error("host storage error: {0}")]
    Host(#[from] HostError),
}
