use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Intended for development: it cannot hand out presigned URLs, so only the direct
/// ingest path works against it.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance rooted at `base_path` (e.g. "/var/lib/reeldrop").
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

/// Hidden sibling of `path`, unique per call.
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.partial", file_name, Uuid::new_v4()))
}

async fn write_then_rename(tmp_path: &Path, path: &Path, data: &[u8]) -> StorageResult<()> {
    let mut file = fs::File::create(tmp_path).await.map_err(|e| {
        StorageError::UploadFailed(format!(
            "Failed to create file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;

    file.write_all(data).await.map_err(|e| {
        StorageError::UploadFailed(format!(
            "Failed to write file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::UploadFailed(format!(
            "Failed to sync file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;
    drop(file);

    fs::rename(tmp_path, path).await.map_err(|e| {
        StorageError::UploadFailed(format!(
            "Failed to move file into place {}: {}",
            path.display(),
            e
        ))
    })
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_object(
        &self,
        storage_key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        // Each write gets its own temp file; the rename decides the last writer.
        let tmp_path = temp_path_for(&path);
        if let Err(e) = write_then_rename(&tmp_path, &path, &data).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        error = %cleanup,
                        path = %tmp_path.display(),
                        "Failed to remove temp file"
                    );
                }
            }
            return Err(e);
        }

        tracing::info!(
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local put_object successful"
        );

        Ok(())
    }

    async fn presigned_put_url(
        &self,
        _storage_key: &str,
        _content_type: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        Err(StorageError::ConfigError(
            "Presigned upload URLs are not supported by the local storage backend".to_string(),
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
