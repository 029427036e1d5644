//! Domain entity definitions.

mod artifact;
mod entity;
mod settings;

pub use artifact::{CachedArtifact, HexColor, StoredPayload};
pub use entity::{EntityId, EntityInfo, EntityStatus, SourceImageId};
pub use settings::{DEFAULT_IMAGE_SIZE, DEFAULT_JPEG_QUALITY, GenerationSettings, PostTypeFilter};
