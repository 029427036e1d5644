//! Artifact store backends.

mod file_store;
mod metadata_store;

pub use file_store::{FileArtifactStore, PAYLOAD_EXTENSION};
pub use metadata_store::MetadataArtifactStore;
