//! Artifact store backed by entity metadata.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::entities::{EntityId, StoredPayload};
use crate::domain::errors::StoreError;
use crate::domain::meta_keys;
use crate::domain::ports::{ArtifactStorePort, MetaStorePort};

/// Stores payloads as a text attribute on each entity.
///
/// Metadata is text-oriented, so deflated binaries are rejected.
pub struct MetadataArtifactStore {
    meta: Arc<dyn MetaStorePort>,
}

impl MetadataArtifactStore {
    /// Creates a store writing through `meta`.
    #[must_use]
    pub fn new(meta: Arc<dyn MetaStorePort>) -> Self {
        Self { meta }
    }
}

#[async_trait]
impl ArtifactStorePort for MetadataArtifactStore {
    fn backend(&self) -> &'static str {
        "metadata"
    }

    async fn put(&self, entity: EntityId, payload: &StoredPayload) -> Result<(), StoreError> {
        let StoredPayload::Text(text) = payload else {
            return Err(StoreError::BinaryUnsupported);
        };
        self.meta.set_meta(entity, meta_keys::PAYLOAD, text).await?;
        debug!(entity = %entity, size = text.len(), "Stored payload in metadata");
        Ok(())
    }

    async fn get(&self, entity: EntityId) -> Option<StoredPayload> {
        match self.meta.get_meta(entity, meta_keys::PAYLOAD).await {
            Ok(Some(text)) if !text.is_empty() => Some(StoredPayload::Text(text)),
            Ok(_) => None,
            Err(e) => {
                warn!(entity = %entity, error = %e, "Failed to read payload metadata");
                None
            }
        }
    }

    async fn delete(&self, entity: EntityId) -> Result<(), StoreError> {
        Ok(self.meta.delete_meta(entity, meta_keys::PAYLOAD).await?)
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        Ok(self.meta.delete_meta_by_key(meta_keys::PAYLOAD).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::host::InMemoryHost;

    fn store() -> (MetadataArtifactStore, Arc<InMemoryHost>) {
        let host = Arc::new(InMemoryHost::new());
        (MetadataArtifactStore::new(host.clone()), host)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (store, host) = store();
        let payload = StoredPayload::Text("#d#abc".to_string());

        store.put(EntityId(1), &payload).await.unwrap();

        assert_eq!(store.get(EntityId(1)).await, Some(payload));
        assert_eq!(
            host.meta_value(EntityId(1), meta_keys::PAYLOAD).as_deref(),
            Some("#d#abc")
        );
    }

    #[tokio::test]
    async fn test_rejects_binary() {
        let (store, _host) = store();
        let result = store
            .put(EntityId(1), &StoredPayload::Binary(vec![1, 2, 3]))
            .await;
        assert!(matches!(result, Err(StoreError::BinaryUnsupported)));
        assert_eq!(store.get(EntityId(1)).await, None);
    }

    #[tokio::test]
    async fn test_delete_and_delete_all() {
        let (store, _host) = store();
        for id in 1..=3 {
            store
                .put(EntityId(id), &StoredPayload::Text(format!("p{id}")))
                .await
                .unwrap();
        }

        store.delete(EntityId(1)).await.unwrap();
        assert_eq!(store.get(EntityId(1)).await, None);

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.get(EntityId(3)).await, None);
    }
}
