//! Ports onto the host content-management system.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::entities::{EntityId, EntityInfo, SourceImageId};
use crate::domain::errors::HostError;

/// Read access to host entities and their attachments.
#[async_trait]
pub trait EntityRepositoryPort: Send + Sync {
    /// Looks up an entity. Returns `None` if it does not exist.
    async fn entity(&self, id: EntityId) -> Result<Option<EntityInfo>, HostError>;

    /// Returns the entity's current source image, if any.
    async fn source_image(&self, id: EntityId) -> Result<Option<SourceImageId>, HostError>;

    /// Resolves an attachment to the path of its file on disk.
    async fn attached_file(&self, image: SourceImageId) -> Result<Option<PathBuf>, HostError>;
}

/// Per-entity string attributes.
#[async_trait]
pub trait MetaStorePort: Send + Sync {
    /// Reads a meta value.
    async fn get_meta(&self, entity: EntityId, key: &str) -> Result<Option<String>, HostError>;

    /// Writes a meta value, replacing any previous one.
    async fn set_meta(&self, entity: EntityId, key: &str, value: &str) -> Result<(), HostError>;

    /// Deletes a meta value. Deleting a missing key is not an error.
    async fn delete_meta(&self, entity: EntityId, key: &str) -> Result<(), HostError>;

    /// Deletes `key` from every entity, returning how many values were removed.
    async fn delete_meta_by_key(&self, key: &str) -> Result<usize, HostError>;
}

/// Process-wide string options.
#[async_trait]
pub trait OptionStorePort: Send + Sync {
    /// Reads an option.
    async fn get_option(&self, key: &str) -> Result<Option<String>, HostError>;

    /// Writes an option.
    async fn set_option(&self, key: &str, value: &str) -> Result<(), HostError>;

    /// Deletes an option. Deleting a missing key is not an error.
    async fn delete_option(&self, key: &str) -> Result<(), HostError>;
}
