//! Infrastructure layer with adapters for the host, storage, and image codecs.

/// Application configuration.
pub mod config;
/// In-memory host collaborators.
pub mod host;
/// Image rendering and color extraction.
pub mod image;
/// Artifact store backends.
pub mod store;

pub use config::{
    AppConfig, CliArgs, Command, ConfigError, LogLevel, StorageManager, TomlOptionStore,
};
pub use host::InMemoryHost;
pub use image::ImageCrateRenderer;
pub use store::{FileArtifactStore, MetadataArtifactStore};
