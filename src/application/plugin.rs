//! Host-facing entry point: meta change hooks, template getters, lifecycle.

use tracing::{debug, info, warn};

use crate::application::context::ThumbnailPorts;
use crate::application::services::{Regeneration, ThumbnailService};
use crate::domain::entities::{EntityId, GenerationSettings};
use crate::domain::errors::ThumbnailResult;
use crate::domain::events::{MetaEvent, SourceImageChange};
use crate::domain::meta_keys;

/// The thumbnail plugin as the host sees it.
pub struct ThumbnailPlugin {
    ports: ThumbnailPorts,
    service: ThumbnailService,
}

impl ThumbnailPlugin {
    /// Initializes the plugin, invalidating the cache if `settings` changed
    /// since the last run.
    ///
    /// # Errors
    /// Returns error if the persisted state cannot be accessed.
    pub async fn new(settings: GenerationSettings, ports: ThumbnailPorts) -> ThumbnailResult<Self> {
        let service = ThumbnailService::initialize(settings, &ports).await?;
        Ok(Self { ports, service })
    }

    /// Returns the underlying service.
    #[must_use]
    pub const fn service(&self) -> &ThumbnailService {
        &self.service
    }

    /// Reacts to a host meta event. Only source image changes are acted on.
    ///
    /// Failures are logged and swallowed; the next save or read retries.
    pub async fn handle(&self, event: &MetaEvent) {
        let Some(change) = event.source_image_change() else {
            return;
        };

        match change {
            SourceImageChange::Changed { entity, source } => {
                debug!(entity = %entity, source = ?source, "Source image changed");
                self.on_entity_meta_changed(entity).await;
            }
            SourceImageChange::Removed { entity } => {
                debug!(entity = %entity, "Source image removed");
                self.on_entity_meta_deleted(entity).await;
            }
        }
    }

    /// Regenerates the thumbnail of `entity` if its source image changed.
    pub async fn on_entity_meta_changed(&self, entity: EntityId) -> Option<Regeneration> {
        match self.service.on_source_image_changed(entity, false).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(
                    entity = %entity,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Thumbnail regeneration failed"
                );
                None
            }
        }
    }

    /// Drops the thumbnail of `entity` after its source image was removed.
    pub async fn on_entity_meta_deleted(&self, entity: EntityId) {
        if let Err(e) = self.service.on_source_image_removed(entity).await {
            warn!(entity = %entity, error = %e, "Failed to remove thumbnail");
        }
    }

    /// Returns the thumbnail data URI of `entity`, regenerating it if missing.
    pub async fn get_thumbnail(&self, entity: EntityId) -> Option<String> {
        self.service.read(entity).await
    }

    /// Returns the dominant color of `entity` as `#rrggbb`, or `""`.
    pub async fn get_color(&self, entity: EntityId) -> String {
        self.service.read_color(entity).await
    }

    /// Applies new settings. Returns true if the cache was invalidated.
    ///
    /// # Errors
    /// Returns error if the persisted state cannot be accessed. The previous
    /// settings stay active in that case.
    pub async fn reconfigure(&mut self, settings: GenerationSettings) -> ThumbnailResult<bool> {
        if &settings == self.service.settings() {
            return Ok(false);
        }
        let service = ThumbnailService::initialize(settings, &self.ports).await?;
        let invalidated = service.initialization().invalidated;
        self.service = service;
        info!(invalidated, "Reconfigured thumbnail plugin");
        Ok(invalidated)
    }

    /// Deletes every cached thumbnail.
    ///
    /// # Errors
    /// Returns error if the cache cannot be cleared.
    pub async fn clear_cache(&self) -> ThumbnailResult<usize> {
        self.service.clear_cache().await
    }

    /// Removes everything the plugin persisted.
    ///
    /// # Errors
    /// Returns error if options, meta, or the cache directory cannot be removed.
    pub async fn uninstall(self) -> ThumbnailResult<()> {
        self.ports
            .options
            .delete_option(meta_keys::JPEG_PREFIX)
            .await?;
        self.ports
            .options
            .delete_option(meta_keys::SETTINGS_VERSION)
            .await?;
        self.service.clear_cache().await?;
        self.ports.file_store.destroy().await?;
        info!("Uninstalled thumbnail plugin");
        Ok(())
    }
}
