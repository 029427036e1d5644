//! Domain layer with core entities, events, errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Host metadata events.
pub mod events;
/// Persisted key names.
pub mod meta_keys;
/// Port definitions.
pub mod ports;

pub use entities::{EntityId, GenerationSettings, SourceImageId};
pub use errors::ThumbnailError;
pub use events::MetaEvent;
pub use ports::{ArtifactStorePort, ImageRendererPort};
