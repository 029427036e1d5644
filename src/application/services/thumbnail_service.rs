//! Per-entity thumbnail lifecycle.
//!
//! An entity's artifact moves `Absent -> Fresh`, goes `Stale` when its source
//! image changes or the settings fingerprint invalidates the cache, and is
//! regenerated either on the next source image event or lazily by [`read`].
//!
//! [`read`]: ThumbnailService::read

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::context::ThumbnailPorts;
use crate::application::services::{
    CacheInvalidator, InvalidationOutcome, PayloadCodec, SettingsFingerprint, ThumbnailPipeline,
};
use crate::domain::entities::{
    CachedArtifact, EntityId, GenerationSettings, HexColor, SourceImageId,
};
use crate::domain::errors::{ThumbnailError, ThumbnailResult};
use crate::domain::meta_keys;
use crate::domain::ports::{ArtifactStorePort, EntityRepositoryPort, MetaStorePort};

/// Why a regeneration request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Entity missing, a revision, or trashed.
    InvalidEntity,
    /// Entity kind not enabled.
    FilteredOut,
    /// Entity has no source image.
    NoSourceImage,
}

/// Outcome of [`ThumbnailService::on_source_image_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regeneration {
    /// Nothing to do for this entity.
    Skipped(SkipReason),
    /// The artifact already derives from the current source image.
    Unchanged,
    /// A new artifact was written.
    Regenerated {
        /// Source image the artifact now derives from.
        source: SourceImageId,
    },
}

/// Generates, stores, and serves thumbnails for one set of settings.
pub struct ThumbnailService {
    settings: GenerationSettings,
    entities: Arc<dyn EntityRepositoryPort>,
    meta: Arc<dyn MetaStorePort>,
    store: Arc<dyn ArtifactStorePort>,
    pipeline: ThumbnailPipeline,
    codec: PayloadCodec,
    invalidator: CacheInvalidator,
    initialization: InvalidationOutcome,
}

impl ThumbnailService {
    /// Builds the service, purging the cache if the settings fingerprint
    /// changed and loading or regenerating the dictionary prefix.
    ///
    /// # Errors
    /// Returns error if the persisted options or the cache cannot be accessed.
    pub async fn initialize(
        settings: GenerationSettings,
        ports: &ThumbnailPorts,
    ) -> ThumbnailResult<Self> {
        let store = ports.store_for(&settings);
        let pipeline = ThumbnailPipeline::new(ports.renderer.clone(), &settings);
        let invalidator = CacheInvalidator::new(
            ports.options.clone(),
            ports.meta.clone(),
            store.clone(),
            ports.file_store.clone(),
        );

        let fingerprint = SettingsFingerprint::of(&settings)?;
        let initialization = invalidator.check_and_invalidate(&fingerprint).await?;
        let prefix = invalidator
            .dictionary_prefix(&pipeline, initialization.invalidated)
            .await?;
        let codec = PayloadCodec::new(&settings).with_dictionary_prefix(prefix);

        info!(
            backend = store.backend(),
            size = settings.image_size,
            quality = settings.effective_quality(),
            invalidated = initialization.invalidated,
            "Thumbnail service initialized"
        );

        Ok(Self {
            settings,
            entities: ports.entities.clone(),
            meta: ports.meta.clone(),
            store,
            pipeline,
            codec,
            invalidator,
            initialization,
        })
    }

    /// Returns the live settings.
    #[must_use]
    pub const fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Returns what happened to the cache during initialization.
    #[must_use]
    pub const fn initialization(&self) -> &InvalidationOutcome {
        &self.initialization
    }

    /// Returns the codec, including the loaded dictionary prefix.
    #[must_use]
    pub const fn codec(&self) -> &PayloadCodec {
        &self.codec
    }

    /// Returns the active artifact store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ArtifactStorePort> {
        &self.store
    }

    /// Regenerates the artifact of `entity` if its source image changed, or
    /// unconditionally when `reload` is set.
    ///
    /// On failure nothing is written: the previous artifact stays and the new
    /// source image id is not recorded, so a later call retries.
    ///
    /// # Errors
    /// Returns error if the source image cannot be rendered or the artifact
    /// cannot be stored.
    pub async fn on_source_image_changed(
        &self,
        entity: EntityId,
        reload: bool,
    ) -> ThumbnailResult<Regeneration> {
        let Some(info) = self.entities.entity(entity).await? else {
            return Ok(Regeneration::Skipped(SkipReason::InvalidEntity));
        };
        if !info.is_eligible() {
            debug!(entity = %entity, "Skipping revision or trashed entity");
            return Ok(Regeneration::Skipped(SkipReason::InvalidEntity));
        }
        if !self.settings.post_types.allows(&info.kind) {
            debug!(entity = %entity, kind = %info.kind, "Entity kind not enabled");
            return Ok(Regeneration::Skipped(SkipReason::FilteredOut));
        }

        let Some(source) = self.entities.source_image(entity).await? else {
            return Ok(Regeneration::Skipped(SkipReason::NoSourceImage));
        };
        if !reload && self.recorded_source(entity).await? == Some(source) {
            debug!(entity = %entity, source = %source, "Source image unchanged");
            return Ok(Regeneration::Unchanged);
        }

        let path = self
            .entities
            .attached_file(source)
            .await?
            .ok_or_else(|| ThumbnailError::source_unavailable(source))?;

        let color = if self.settings.store_color {
            Some(self.pipeline.dominant_color(&path).await?)
        } else {
            None
        };
        let payload = if self.settings.store_payload {
            let rendered = self.pipeline.render(&path).await?;
            Some(self.codec.encode(&rendered.bytes, rendered.mime)?)
        } else {
            None
        };

        // The previous artifact stays intact until the payload is written.
        if let Some(payload) = &payload {
            self.store.put(entity, payload).await?;
        }
        if let Some(color) = &color {
            self.meta
                .set_meta(entity, meta_keys::COLOR, color.digits())
                .await?;
        }
        if payload.is_some() {
            self.meta
                .set_meta(entity, meta_keys::PAYLOAD_SOURCE, &source.to_string())
                .await?;
        }

        info!(
            entity = %entity,
            source = %source,
            size = payload.as_ref().map_or(0, |p| p.len()),
            reload,
            "Regenerated thumbnail"
        );
        Ok(Regeneration::Regenerated { source })
    }

    /// Drops the artifact of `entity` after its source image was removed.
    ///
    /// # Errors
    /// Returns error if the artifact cannot be deleted.
    pub async fn on_source_image_removed(&self, entity: EntityId) -> ThumbnailResult<()> {
        self.store.delete(entity).await?;
        self.meta
            .delete_meta(entity, meta_keys::PAYLOAD_SOURCE)
            .await?;
        self.meta.delete_meta(entity, meta_keys::COLOR).await?;
        debug!(entity = %entity, "Removed thumbnail");
        Ok(())
    }

    /// Returns the thumbnail data URI of `entity`.
    ///
    /// A missing payload whose recorded source id says a thumbnail should
    /// exist (absent, empty, or a positive id) is regenerated on the spot.
    pub async fn read(&self, entity: EntityId) -> Option<String> {
        let recorded = match self.meta.get_meta(entity, meta_keys::PAYLOAD_SOURCE).await {
            Ok(recorded) => recorded,
            Err(e) => {
                warn!(entity = %entity, error = %e, "Failed to read recorded source image");
                return None;
            }
        };

        if let Some(data_uri) = self.read_payload(entity).await {
            return Some(data_uri);
        }
        if !expects_thumbnail(recorded.as_deref()) {
            return None;
        }

        debug!(entity = %entity, "Thumbnail missing, regenerating");
        if let Err(e) = self.on_source_image_changed(entity, true).await {
            warn!(entity = %entity, error = %e, "Lazy thumbnail regeneration failed");
        }
        self.read_payload(entity).await
    }

    /// Returns the dominant color of `entity` as `#rrggbb`, or an empty string
    /// if it has no usable source image.
    pub async fn read_color(&self, entity: EntityId) -> String {
        if let Ok(Some(stored)) = self.meta.get_meta(entity, meta_keys::COLOR).await
            && let Some(color) = HexColor::parse(&stored)
        {
            return color.to_css();
        }

        match self.compute_color(entity).await {
            Ok(Some(color)) => {
                if let Err(e) = self
                    .meta
                    .set_meta(entity, meta_keys::COLOR, color.digits())
                    .await
                {
                    warn!(entity = %entity, error = %e, "Failed to cache dominant color");
                }
                color.to_css()
            }
            Ok(None) => String::new(),
            Err(e) => {
                warn!(entity = %entity, error = %e, "Failed to compute dominant color");
                String::new()
            }
        }
    }

    /// Returns everything cached for `entity`, without regenerating.
    ///
    /// # Errors
    /// Returns error if the host meta cannot be read.
    pub async fn artifact(&self, entity: EntityId) -> ThumbnailResult<CachedArtifact> {
        let color = self
            .meta
            .get_meta(entity, meta_keys::COLOR)
            .await?
            .and_then(|value| HexColor::parse(&value));
        Ok(CachedArtifact {
            source_image_id: self.recorded_source(entity).await?,
            payload: self.store.get(entity).await,
            color,
        })
    }

    /// Deletes every cached artifact.
    ///
    /// # Errors
    /// Returns error if the cache cannot be cleared.
    pub async fn clear_cache(&self) -> ThumbnailResult<usize> {
        self.invalidator.clear_cache().await
    }

    async fn recorded_source(&self, entity: EntityId) -> ThumbnailResult<Option<SourceImageId>> {
        Ok(self
            .meta
            .get_meta(entity, meta_keys::PAYLOAD_SOURCE)
            .await?
            .and_then(|value| SourceImageId::parse(&value)))
    }

    async fn read_payload(&self, entity: EntityId) -> Option<String> {
        let stored = self.store.get(entity).await?;
        match self.codec.expand(&stored) {
            Ok(data_uri) => Some(data_uri),
            Err(e) => {
                warn!(entity = %entity, error = %e, "Discarding unreadable payload");
                None
            }
        }
    }

    async fn compute_color(&self, entity: EntityId) -> ThumbnailResult<Option<HexColor>> {
        let Some(source) = self.entities.source_image(entity).await? else {
            return Ok(None);
        };
        let Some(path) = self.entities.attached_file(source).await? else {
            return Ok(None);
        };
        Ok(Some(self.pipeline.dominant_color(&path).await?))
    }
}

/// True if a missing payload should be regenerated given the recorded source.
fn expects_thumbnail(recorded: Option<&str>) -> bool {
    match recorded.map(str::trim) {
        None | Some("") => true,
        Some(value) => SourceImageId::parse(value).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::context::testing::{add_post, attach_jpeg, ports};
    use crate::domain::entities::{EntityInfo, EntityStatus, PostTypeFilter, StoredPayload};
    use crate::domain::ports::mocks::{STUB_JPEG, StubRenderer};
    use crate::infrastructure::host::InMemoryHost;
    use tempfile::TempDir;

    struct Fixture {
        host: Arc<InMemoryHost>,
        renderer: Arc<StubRenderer>,
        ports: ThumbnailPorts,
        dir: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let host = Arc::new(InMemoryHost::new());
            let renderer = Arc::new(StubRenderer::new());
            let ports = ports(&host, &renderer, &dir.path().join("cache"));
            Self {
                host,
                renderer,
                ports,
                dir,
            }
        }

        async fn service(&self, settings: GenerationSettings) -> ThumbnailService {
            ThumbnailService::initialize(settings, &self.ports)
                .await
                .unwrap()
        }

        fn add_post(&self, entity: u64, kind: &str, image: u64) {
            add_post(&self.host, entity, kind, image, self.dir.path());
        }

        fn switch_image(&self, entity: u64, image: u64) {
            attach_jpeg(&self.host, image, self.dir.path());
            self.host
                .assign_source_image(EntityId(entity), Some(SourceImageId(image)));
        }
    }

    #[test]
    fn test_expects_thumbnail() {
        assert!(expects_thumbnail(None));
        assert!(expects_thumbnail(Some("")));
        assert!(expects_thumbnail(Some("7")));
        assert!(!expects_thumbnail(Some("0")));
        assert!(!expects_thumbnail(Some("junk")));
    }

    #[tokio::test]
    async fn test_initialize_regenerates_prefix() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;

        assert!(service.initialization().invalidated);
        assert_eq!(service.codec().dictionary_prefix(), "SkZ");
        assert_eq!(
            fixture.host.option_value(meta_keys::JPEG_PREFIX).as_deref(),
            Some("SkZ")
        );
        assert_eq!(fixture.renderer.renders(), 1);
    }

    #[tokio::test]
    async fn test_second_initialize_reuses_prefix() {
        let fixture = Fixture::new();
        fixture.service(GenerationSettings::default()).await;
        let service = fixture.service(GenerationSettings::default()).await;

        assert!(!service.initialization().invalidated);
        assert_eq!(service.codec().dictionary_prefix(), "SkZ");
        assert_eq!(fixture.renderer.renders(), 1);
    }

    #[tokio::test]
    async fn test_scenario_post_42() {
        let fixture = Fixture::new();
        let service = fixture
            .service(GenerationSettings {
                image_size: 40,
                jpeg_quality: 30,
                post_types: PostTypeFilter::Any,
                ..GenerationSettings::default()
            })
            .await;
        let entity = EntityId(42);
        fixture.add_post(42, "post", 7);
        let baseline = fixture.renderer.renders();

        let outcome = service.on_source_image_changed(entity, false).await.unwrap();
        assert_eq!(
            outcome,
            Regeneration::Regenerated {
                source: SourceImageId(7)
            }
        );
        let stored = fixture.host.meta_value(entity, meta_keys::PAYLOAD).unwrap();
        assert!(stored.starts_with("#d#"));
        assert_eq!(
            fixture.host.meta_value(entity, meta_keys::PAYLOAD_SOURCE).as_deref(),
            Some("7")
        );
        let data_uri = service.read(entity).await.unwrap();
        assert!(data_uri.starts_with("data:image/jpeg;base64,"));

        let outcome = service.on_source_image_changed(entity, false).await.unwrap();
        assert_eq!(outcome, Regeneration::Unchanged);
        assert_eq!(fixture.renderer.renders(), baseline + 1);

        fixture.switch_image(42, 9);
        let outcome = service.on_source_image_changed(entity, false).await.unwrap();
        assert_eq!(
            outcome,
            Regeneration::Regenerated {
                source: SourceImageId(9)
            }
        );
        assert_eq!(fixture.renderer.renders(), baseline + 2);
        assert_eq!(
            fixture.host.meta_value(entity, meta_keys::PAYLOAD_SOURCE).as_deref(),
            Some("9")
        );

        fixture.host.assign_source_image(entity, None);
        service.on_source_image_removed(entity).await.unwrap();
        assert_eq!(fixture.host.meta_value(entity, meta_keys::PAYLOAD), None);
        assert_eq!(fixture.host.meta_value(entity, meta_keys::PAYLOAD_SOURCE), None);
        assert_eq!(service.read(entity).await, None);
    }

    #[tokio::test]
    async fn test_reload_forces_regeneration() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.add_post(1, "post", 7);

        service.on_source_image_changed(EntityId(1), false).await.unwrap();
        let outcome = service.on_source_image_changed(EntityId(1), true).await.unwrap();

        assert!(matches!(outcome, Regeneration::Regenerated { .. }));
    }

    #[tokio::test]
    async fn test_filter_blocks_other_kinds() {
        let fixture = Fixture::new();
        let service = fixture
            .service(GenerationSettings {
                post_types: PostTypeFilter::List(vec!["page".to_string()]),
                ..GenerationSettings::default()
            })
            .await;
        fixture.add_post(1, "post", 7);
        fixture.add_post(2, "page", 8);

        assert_eq!(
            service.on_source_image_changed(EntityId(1), false).await.unwrap(),
            Regeneration::Skipped(SkipReason::FilteredOut)
        );
        assert_eq!(fixture.host.meta_value(EntityId(1), meta_keys::PAYLOAD), None);

        assert!(matches!(
            service.on_source_image_changed(EntityId(2), false).await.unwrap(),
            Regeneration::Regenerated { .. }
        ));
        assert!(fixture.host.meta_value(EntityId(2), meta_keys::PAYLOAD).is_some());
    }

    #[tokio::test]
    async fn test_invalid_entities_are_skipped() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.add_post(1, "post", 7);
        fixture
            .host
            .insert_entity(EntityInfo::new(1, "post").with_status(EntityStatus::Trash));
        fixture.add_post(2, "post", 7);
        fixture
            .host
            .insert_entity(EntityInfo::new(2, "post").as_revision());

        for id in [1, 2, 404] {
            assert_eq!(
                service.on_source_image_changed(EntityId(id), false).await.unwrap(),
                Regeneration::Skipped(SkipReason::InvalidEntity)
            );
        }
    }

    #[tokio::test]
    async fn test_no_source_image() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.host.insert_entity(EntityInfo::new(3, "post"));

        assert_eq!(
            service.on_source_image_changed(EntityId(3), false).await.unwrap(),
            Regeneration::Skipped(SkipReason::NoSourceImage)
        );
    }

    #[tokio::test]
    async fn test_missing_attachment_file_is_an_error() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.host.insert_entity(EntityInfo::new(3, "post"));
        fixture
            .host
            .assign_source_image(EntityId(3), Some(SourceImageId(99)));

        let result = service.on_source_image_changed(EntityId(3), false).await;
        assert!(matches!(
            result,
            Err(ThumbnailError::SourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_render_failure_keeps_previous_artifact() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.add_post(1, "post", 7);
        service.on_source_image_changed(EntityId(1), false).await.unwrap();
        let before = fixture.host.meta_value(EntityId(1), meta_keys::PAYLOAD);

        fixture.switch_image(1, 9);
        fixture.renderer.set_failing(true);
        let result = service.on_source_image_changed(EntityId(1), false).await;

        assert!(matches!(result, Err(ThumbnailError::Render(_))));
        assert_eq!(fixture.host.meta_value(EntityId(1), meta_keys::PAYLOAD), before);
        assert_eq!(
            fixture
                .host
                .meta_value(EntityId(1), meta_keys::PAYLOAD_SOURCE)
                .as_deref(),
            Some("7")
        );

        fixture.renderer.set_failing(false);
        let retried = service.on_source_image_changed(EntityId(1), false).await.unwrap();
        assert_eq!(
            retried,
            Regeneration::Regenerated {
                source: SourceImageId(9)
            }
        );
    }

    #[tokio::test]
    async fn test_store_failure_keeps_previous_color() {
        let fixture = Fixture::new();
        let service = fixture
            .service(GenerationSettings {
                cache_in_file: true,
                store_color: true,
                ..GenerationSettings::default()
            })
            .await;
        std::fs::write(fixture.dir.path().join("cache"), b"not a directory").unwrap();
        fixture.add_post(1, "post", 9);
        for (key, value) in [(meta_keys::COLOR, "aabbcc"), (meta_keys::PAYLOAD_SOURCE, "7")] {
            fixture.host.set_meta(EntityId(1), key, value).await.unwrap();
        }

        let result = service.on_source_image_changed(EntityId(1), false).await;

        assert!(matches!(result, Err(ThumbnailError::Store(_))));
        assert_eq!(
            fixture.host.meta_value(EntityId(1), meta_keys::COLOR).as_deref(),
            Some("aabbcc")
        );
        assert_eq!(
            fixture
                .host
                .meta_value(EntityId(1), meta_keys::PAYLOAD_SOURCE)
                .as_deref(),
            Some("7")
        );
    }

    #[tokio::test]
    async fn test_self_healing_read_after_invalidation() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.add_post(5, "post", 7);
        service.on_source_image_changed(EntityId(5), false).await.unwrap();

        let service = fixture
            .service(GenerationSettings {
                jpeg_quality: 50,
                ..GenerationSettings::default()
            })
            .await;
        assert!(service.initialization().invalidated);
        assert_eq!(fixture.host.meta_value(EntityId(5), meta_keys::PAYLOAD), None);

        let data_uri = service.read(EntityId(5)).await.unwrap();
        assert!(data_uri.starts_with("data:image/jpeg;base64,/9j/"));

        let artifact = service.artifact(EntityId(5)).await.unwrap();
        assert!(artifact.is_fresh_for(SourceImageId(7)));
    }

    #[tokio::test]
    async fn test_read_respects_recorded_zero() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.add_post(5, "post", 7);
        fixture
            .host
            .set_meta(EntityId(5), meta_keys::PAYLOAD_SOURCE, "0")
            .await
            .unwrap();
        let baseline = fixture.renderer.renders();

        assert_eq!(service.read(EntityId(5)).await, None);
        assert_eq!(fixture.renderer.renders(), baseline);
    }

    #[tokio::test]
    async fn test_file_backend_round_trip() {
        let fixture = Fixture::new();
        let service = fixture
            .service(GenerationSettings {
                cache_in_file: true,
                ..GenerationSettings::default()
            })
            .await;
        fixture.add_post(42, "post", 7);

        service.on_source_image_changed(EntityId(42), false).await.unwrap();

        let file = fixture.dir.path().join("cache").join("post-42.base64");
        assert!(file.is_file());
        assert_eq!(fixture.host.meta_value(EntityId(42), meta_keys::PAYLOAD), None);

        let data_uri = service.read(EntityId(42)).await.unwrap();
        let decoded = PayloadCodec::parse_data_uri(&data_uri).unwrap();
        assert_eq!(decoded.bytes, STUB_JPEG);
        assert_eq!(decoded.mime, "image/jpeg");
    }

    #[tokio::test]
    async fn test_color_is_stored_when_enabled() {
        let fixture = Fixture::new();
        let service = fixture
            .service(GenerationSettings {
                store_color: true,
                ..GenerationSettings::default()
            })
            .await;
        fixture.add_post(1, "post", 7);

        service.on_source_image_changed(EntityId(1), false).await.unwrap();

        assert_eq!(
            fixture.host.meta_value(EntityId(1), meta_keys::COLOR).as_deref(),
            Some("336699")
        );
        assert_eq!(service.read_color(EntityId(1)).await, "#336699");
    }

    #[tokio::test]
    async fn test_read_color_computes_on_demand() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.add_post(1, "post", 7);

        assert_eq!(service.read_color(EntityId(1)).await, "#336699");
        assert_eq!(
            fixture.host.meta_value(EntityId(1), meta_keys::COLOR).as_deref(),
            Some("336699")
        );
    }

    #[tokio::test]
    async fn test_read_color_without_source_image() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.host.insert_entity(EntityInfo::new(1, "post"));

        assert_eq!(service.read_color(EntityId(1)).await, "");
        assert_eq!(fixture.host.meta_value(EntityId(1), meta_keys::COLOR), None);
    }

    #[tokio::test]
    async fn test_payload_disabled_records_nothing() {
        let fixture = Fixture::new();
        let service = fixture
            .service(GenerationSettings {
                store_payload: false,
                store_color: true,
                ..GenerationSettings::default()
            })
            .await;
        fixture.add_post(1, "post", 7);
        let baseline = fixture.renderer.renders();

        service.on_source_image_changed(EntityId(1), false).await.unwrap();

        assert_eq!(fixture.renderer.renders(), baseline);
        assert_eq!(fixture.host.meta_value(EntityId(1), meta_keys::PAYLOAD_SOURCE), None);
        assert!(fixture.host.meta_value(EntityId(1), meta_keys::COLOR).is_some());
    }

    #[tokio::test]
    async fn test_artifact_reports_stored_state() {
        let fixture = Fixture::new();
        let service = fixture.service(GenerationSettings::default()).await;
        fixture.add_post(1, "post", 7);

        assert_eq!(
            service.artifact(EntityId(1)).await.unwrap(),
            CachedArtifact::default()
        );

        service.on_source_image_changed(EntityId(1), false).await.unwrap();
        let artifact = service.artifact(EntityId(1)).await.unwrap();
        assert_eq!(artifact.source_image_id, Some(SourceImageId(7)));
        assert!(matches!(artifact.payload, Some(StoredPayload::Text(_))));
    }
}
