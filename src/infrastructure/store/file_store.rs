//! File-based artifact store, one file per entity.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace, warn};

use crate::domain::entities::{EntityId, StoredPayload};
use crate::domain::errors::StoreError;
use crate::domain::ports::ArtifactStorePort;

/// Extension of payload files.
pub const PAYLOAD_EXTENSION: &str = "base64";

/// Marker denying direct web access to the cache directory.
const ACCESS_MARKER: &str = ".htaccess";
const ACCESS_MARKER_CONTENT: &str = "deny from all";

#[cfg(unix)]
const CACHE_DIR_MODE: u32 = 0o755;

/// Stores payloads as `<cache_dir>/post-<id>.base64`.
///
/// The directory is created lazily on the first write.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    cache_dir: PathBuf,
}

impl FileArtifactStore {
    /// Creates a store rooted at `cache_dir`. Nothing is touched on disk yet.
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the payload file of an entity.
    #[must_use]
    pub fn payload_path(&self, entity: EntityId) -> PathBuf {
        self.cache_dir
            .join(format!("post-{entity}.{PAYLOAD_EXTENSION}"))
    }

    /// Creates the cache directory and its access marker if missing.
    async fn ensure_dir(&self) -> Result<(), StoreError> {
        if fs::try_exists(&self.cache_dir).await.unwrap_or(false) {
            return Ok(());
        }

        fs::create_dir_all(&self.cache_dir).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(
                &self.cache_dir,
                std::fs::Permissions::from_mode(CACHE_DIR_MODE),
            )
            .await?;
        }
        fs::write(self.cache_dir.join(ACCESS_MARKER), ACCESS_MARKER_CONTENT).await?;

        debug!(path = %self.cache_dir.display(), "Created thumbnail cache directory");
        Ok(())
    }

    /// Returns the number of payload files on disk.
    pub async fn len(&self) -> usize {
        self.payload_files().await.len()
    }

    /// Returns true if no payload file exists.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn payload_files(&self) -> Vec<PathBuf> {
        let Ok(mut entries) = fs::read_dir(&self.cache_dir).await else {
            return Vec::new();
        };

        let mut files = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == PAYLOAD_EXTENSION) {
                files.push(path);
            }
        }
        files
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn put(&self, entity: EntityId, payload: &StoredPayload) -> Result<(), StoreError> {
        self.ensure_dir().await?;
        let path = self.payload_path(entity);

        let mut file = fs::File::create(&path).await?;
        file.write_all(payload.as_bytes()).await?;
        file.flush().await?;

        debug!(
            entity = %entity,
            path = %path.display(),
            size = payload.len(),
            "Stored payload file"
        );
        Ok(())
    }

    async fn get(&self, entity: EntityId) -> Option<StoredPayload> {
        let path = self.payload_path(entity);
        match fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => {
                trace!(entity = %entity, "Payload file hit");
                Some(StoredPayload::Binary(bytes))
            }
            Ok(_) => None,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(entity = %entity, "Payload file miss");
                None
            }
            Err(e) => {
                warn!(entity = %entity, error = %e, "Failed to read payload file");
                None
            }
        }
    }

    async fn delete(&self, entity: EntityId) -> Result<(), StoreError> {
        match fs::remove_file(self.payload_path(entity)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_all(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for path in self.payload_files().await {
            if let Err(e) = fs::remove_file(&path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove payload file");
            } else {
                removed += 1;
            }
        }
        debug!(removed, "Cleared payload files");
        Ok(removed)
    }

    async fn destroy(&self) -> Result<(), StoreError> {
        match fs::remove_dir_all(&self.cache_dir).await {
            Ok(()) => {
                debug!(path = %self.cache_dir.display(), "Removed thumbnail cache directory");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
