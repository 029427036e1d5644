//! Process-local host implementing entity, meta, and option storage.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use crate::domain::entities::{EntityId, EntityInfo, SourceImageId};
use crate::domain::errors::HostError;
use crate::domain::meta_keys;
use crate::domain::ports::{EntityRepositoryPort, MetaStorePort, OptionStorePort};

#[derive(Debug, Default)]
struct HostState {
    entities: HashMap<EntityId, EntityInfo>,
    meta: HashMap<EntityId, HashMap<String, String>>,
    attachments: HashMap<SourceImageId, PathBuf>,
    options: HashMap<String, String>,
}

/// In-memory host.
///
/// Source images are read from the `_thumbnail_id` meta, as a CMS would.
/// Callers are responsible for dispatching the matching
/// [`MetaEvent`](crate::domain::MetaEvent) after changing it.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    state: RwLock<HostState>,
}

impl InMemoryHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entity.
    pub fn insert_entity(&self, info: EntityInfo) {
        self.state.write().entities.insert(info.id, info);
    }

    /// Registers the file backing an attachment.
    pub fn attach(&self, image: SourceImageId, path: impl AsRef<Path>) {
        self.state
            .write()
            .attachments
            .insert(image, path.as_ref().to_path_buf());
    }

    /// Sets or clears an entity's source image.
    pub fn assign_source_image(&self, entity: EntityId, image: Option<SourceImageId>) {
        let mut state = self.state.write();
        let meta = state.meta.entry(entity).or_default();
        match image {
            Some(image) => {
                meta.insert(meta_keys::SOURCE_IMAGE.to_string(), image.to_string());
            }
            None => {
                meta.remove(meta_keys::SOURCE_IMAGE);
            }
        }
    }

    /// Returns a meta value without going through the port.
    #[must_use]
    pub fn meta_value(&self, entity: EntityId, key: &str) -> Option<String> {
        self.state
            .read()
            .meta
            .get(&entity)
            .and_then(|meta| meta.get(key))
            .cloned()
    }

    /// Returns an option without going through the port.
    #[must_use]
    pub fn option_value(&self, key: &str) -> Option<String> {
        self.state.read().options.get(key).cloned()
    }

    /// Sets an option without going through the port.
    pub fn seed_option(&self, key: &str, value: &str) {
        self.state
            .write()
            .options
            .insert(key.to_string(), value.to_string());
    }

    /// Counts entities carrying `key`.
    #[must_use]
    pub fn count_meta(&self, key: &str) -> usize {
        self.state
            .read()
            .meta
            .values()
            .filter(|meta| meta.contains_key(key))
            .count()
    }
}

#[async_trait]
impl EntityRepositoryPort for InMemoryHost {
    async fn entity(&self, id: EntityId) -> Result<Option<EntityInfo>, HostError> {
        Ok(self.state.read().entities.get(&id).cloned())
    }

    async fn source_image(&self, id: EntityId) -> Result<Option<SourceImageId>, HostError> {
        Ok(self
            .meta_value(id, meta_keys::SOURCE_IMAGE)
            .and_then(|value| SourceImageId::parse(&value)))
    }

    async fn attached_file(&self, image: SourceImageId) -> Result<Option<PathBuf>, HostError> {
        Ok(self.state.read().attachments.get(&image).cloned())
    }
}

#[async_trait]
impl MetaStorePort for InMemoryHost {
    async fn get_meta(&self, entity: EntityId, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.meta_value(entity, key))
    }

    async fn set_meta(&self, entity: EntityId, key: &str, value: &str) -> Result<(), HostError> {
        trace!(entity = %entity, key, "Setting meta");
        self.state
            .write()
            .meta
            .entry(entity)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete_meta(&self, entity: EntityId, key: &str) -> Result<(), HostError> {
        if let Some(meta) = self.state.write().meta.get_mut(&entity) {
            meta.remove(key);
        }
        Ok(())
    }

    async fn delete_meta_by_key(&self, key: &str) -> Result<usize, HostError> {
        let mut state = self.state.write();
        let removed = state
            .meta
            .values_mut()
            .filter_map(|meta| meta.remove(key))
            .count();
        Ok(removed)
    }
}

#[async_trait]
impl OptionStorePort for InMemoryHost {
    async fn get_option(&self, key: &str) -> Result<Option<String>, HostError> {
        Ok(self.option_value(key))
    }

    async fn set_option(&self, key: &str, value: &str) -> Result<(), HostError> {
        self.seed_option(key, value);
        Ok(())
    }

    async fn delete_option(&self, key: &str) -> Result<(), HostError> {
        self.state.write().options.remove(key);
        Ok(())
    }
}
