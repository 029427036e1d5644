//! Collaborators the thumbnail core is wired with.

use std::sync::Arc;

use crate::domain::entities::GenerationSettings;
use crate::domain::ports::{
    ArtifactStorePort, EntityRepositoryPort, ImageRendererPort, MetaStorePort, OptionStorePort,
};

/// Host ports, the renderer, and both artifact store backends.
///
/// The active backend is picked once per settings via [`Self::store_for`].
#[derive(Clone)]
pub struct ThumbnailPorts {
    /// Entity lookups.
    pub entities: Arc<dyn EntityRepositoryPort>,
    /// Per-entity attributes.
    pub meta: Arc<dyn MetaStorePort>,
    /// Process-wide options.
    pub options: Arc<dyn OptionStorePort>,
    /// Image renderer.
    pub renderer: Arc<dyn ImageRendererPort>,
    /// Backend used when `cache_in_file` is off.
    pub metadata_store: Arc<dyn ArtifactStorePort>,
    /// Backend used when `cache_in_file` is on. Also removed on uninstall.
    pub file_store: Arc<dyn ArtifactStorePort>,
}

impl ThumbnailPorts {
    /// Returns the artifact store selected by `settings`.
    #[must_use]
    pub fn store_for(&self, settings: &GenerationSettings) -> Arc<dyn ArtifactStorePort> {
        if settings.cache_in_file {
            self.file_store.clone()
        } else {
            self.metadata_store.clone()
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use super::*;
    use crate::domain::entities::{EntityId, EntityInfo, SourceImageId};
    use crate::domain::ports::mocks::StubRenderer;
    use crate::infrastructure::host::InMemoryHost;
    use crate::infrastructure::store::{FileArtifactStore, MetadataArtifactStore};

    /// Wires an in-memory host and a stub renderer around a file cache in `cache_dir`.
    pub fn ports(
        host: &Arc<InMemoryHost>,
        renderer: &Arc<StubRenderer>,
        cache_dir: &Path,
    ) -> ThumbnailPorts {
        ThumbnailPorts {
            entities: host.clone(),
            meta: host.clone(),
            options: host.clone(),
            renderer: renderer.clone(),
            metadata_store: Arc::new(MetadataArtifactStore::new(host.clone())),
            file_store: Arc::new(FileArtifactStore::new(cache_dir)),
        }
    }

    /// Adds a published entity whose source image is backed by a `.jpg` file.
    pub fn add_post(host: &InMemoryHost, entity: u64, kind: &str, image: u64, dir: &Path) {
        host.insert_entity(EntityInfo::new(entity, kind));
        attach_jpeg(host, image, dir);
        host.assign_source_image(EntityId(entity), Some(SourceImageId(image)));
    }

    /// Registers an attachment file for `image`.
    pub fn attach_jpeg(host: &InMemoryHost, image: u64, dir: &Path) {
        let path = dir.join(format!("upload-{image}.jpg"));
        std::fs::write(&path, b"source").unwrap();
        host.attach(SourceImageId(image), path);
    }
}
