//! Settings fingerprint and cache invalidation.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::application::services::ThumbnailPipeline;
use crate::domain::entities::GenerationSettings;
use crate::domain::errors::ThumbnailResult;
use crate::domain::meta_keys;
use crate::domain::ports::{ArtifactStorePort, MetaStorePort, OptionStorePort};

/// Bumped whenever the payload layout changes in a way settings don't capture.
const FINGERPRINT_SCHEMA: &str = "dbthumb/0.12";

/// Hash over every generation setting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsFingerprint(String);

impl SettingsFingerprint {
    /// Computes the fingerprint of `settings`.
    ///
    /// # Errors
    /// Returns error if the settings cannot be serialized.
    pub fn of(settings: &GenerationSettings) -> serde_json::Result<Self> {
        let serialized = serde_json::to_vec(settings)?;
        let mut hasher = Sha256::new();
        hasher.update(FINGERPRINT_SCHEMA.as_bytes());
        hasher.update([0u8]);
        hasher.update(&serialized);
        Ok(Self(hex::encode(hasher.finalize())))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `stored` was computed from different settings.
    #[must_use]
    pub fn differs_from(&self, stored: Option<&str>) -> bool {
        stored != Some(self.as_str())
    }
}

impl std::fmt::Display for SettingsFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of comparing the live fingerprint with the persisted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationOutcome {
    /// Fingerprint of the live settings, now persisted.
    pub fingerprint: SettingsFingerprint,
    /// True if every cached artifact was purged.
    pub invalidated: bool,
}

/// Purges cached artifacts when generation settings change.
#[derive(Clone)]
pub struct CacheInvalidator {
    options: Arc<dyn OptionStorePort>,
    meta: Arc<dyn MetaStorePort>,
    store: Arc<dyn ArtifactStorePort>,
    file_store: Arc<dyn ArtifactStorePort>,
}

impl CacheInvalidator {
    /// Creates an invalidator clearing the active `store`, the file cache and
    /// the owned entity meta.
    ///
    /// `file_store` is cleared even when another backend is active, since files
    /// from an earlier file-backed configuration outlive a backend switch.
    #[must_use]
    pub fn new(
        options: Arc<dyn OptionStorePort>,
        meta: Arc<dyn MetaStorePort>,
        store: Arc<dyn ArtifactStorePort>,
        file_store: Arc<dyn ArtifactStorePort>,
    ) -> Self {
        Self {
            options,
            meta,
            store,
            file_store,
        }
    }

    /// Compares `current` with the persisted fingerprint. On mismatch the new
    /// fingerprint is persisted and the cache cleared.
    ///
    /// # Errors
    /// Returns error if the options or the cache cannot be accessed.
    pub async fn check_and_invalidate(
        &self,
        current: &SettingsFingerprint,
    ) -> ThumbnailResult<InvalidationOutcome> {
        let stored = self
            .options
            .get_option(meta_keys::SETTINGS_VERSION)
            .await?;

        if !current.differs_from(stored.as_deref()) {
            debug!(fingerprint = %current, "Generation settings unchanged");
            return Ok(InvalidationOutcome {
                fingerprint: current.clone(),
                invalidated: false,
            });
        }

        info!(
            previous = stored.as_deref().unwrap_or("none"),
            fingerprint = %current,
            "Generation settings changed, invalidating cached thumbnails"
        );
        self.options
            .set_option(meta_keys::SETTINGS_VERSION, current.as_str())
            .await?;
        self.clear_cache().await?;

        Ok(InvalidationOutcome {
            fingerprint: current.clone(),
            invalidated: true,
        })
    }

    /// Deletes every cached artifact across all entities, including cached
    /// files left behind by an inactive file backend.
    ///
    /// Returns the number of payloads removed from the stores.
    ///
    /// # Errors
    /// Returns error if the host meta or a store cannot be cleared.
    pub async fn clear_cache(&self) -> ThumbnailResult<usize> {
        for key in meta_keys::OWNED_ENTITY_KEYS {
            let removed = self.meta.delete_meta_by_key(key).await?;
            debug!(key, removed, "Deleted thumbnail meta");
        }
        let mut removed = self.store.delete_all().await?;
        if self.store.backend() != self.file_store.backend() {
            let files = self.file_store.delete_all().await?;
            debug!(removed = files, "Deleted cached files of inactive backend");
            removed += files;
        }
        info!(backend = self.store.backend(), removed, "Cleared thumbnail cache");
        Ok(removed)
    }

    /// Returns the persisted dictionary prefix, regenerating it when `force`
    /// is set or none is stored.
    ///
    /// A failed regeneration removes any stored prefix and yields an empty
    /// one, so the next initialization tries again.
    ///
    /// # Errors
    /// Returns error if the options cannot be accessed.
    pub async fn dictionary_prefix(
        &self,
        pipeline: &ThumbnailPipeline,
        force: bool,
    ) -> ThumbnailResult<String> {
        if !force
            && let Some(prefix) = self.options.get_option(meta_keys::JPEG_PREFIX).await?
            && !prefix.is_empty()
        {
            return Ok(prefix);
        }

        match pipeline.reference_prefix().await {
            Ok(Some(prefix)) => {
                self.options
                    .set_option(meta_keys::JPEG_PREFIX, &prefix)
                    .await?;
                info!(prefix_len = prefix.len(), "Regenerated dictionary prefix");
                Ok(prefix)
            }
            Ok(None) => {
                warn!("Reference thumbnail has no prefix segment");
                self.drop_prefix().await
            }
            Err(e) => {
                warn!(error = %e, "Failed to regenerate dictionary prefix");
                self.drop_prefix().await
            }
        }
    }

    async fn drop_prefix(&self) -> ThumbnailResult<String> {
        self.options.delete_option(meta_keys::JPEG_PREFIX).await?;
        Ok(String::new())
    }
}
