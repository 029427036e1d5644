//! Port definition for thumbnail payload persistence.

use async_trait::async_trait;

use crate::domain::entities::{EntityId, StoredPayload};
use crate::domain::errors::StoreError;

/// Key-value persistence of encoded payloads, addressed by entity.
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// Human-readable backend name for logs.
    fn backend(&self) -> &'static str;

    /// Stores the payload, replacing any previous one.
    async fn put(&self, entity: EntityId, payload: &StoredPayload) -> Result<(), StoreError>;

    /// Returns the stored payload. Read failures are reported as absent.
    async fn get(&self, entity: EntityId) -> Option<StoredPayload>;

    /// Removes the payload of one entity.
    async fn delete(&self, entity: EntityId) -> Result<(), StoreError>;

    /// Removes every stored payload, returning how many were removed.
    async fn delete_all(&self) -> Result<usize, StoreError>;

    /// Removes payloads and any resources the backend owns.
    async fn destroy(&self) -> Result<(), StoreError> {
        self.delete_all().await.map(|_| ())
    }
}
