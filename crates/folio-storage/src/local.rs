//! Local filesystem storage implementation

use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use folio_core::UploadConfig;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage.
///
/// Writes every artifact directly into one root directory; no per-entity
/// subdirectories, so a file name maps 1:1 to a path and a public URL.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the root directory if
    /// needed.
    pub async fn new(config: &UploadConfig) -> StorageResult<Self> {
        let base_path = PathBuf::from(&config.upload_dir);

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: config.public_base_path.trim_end_matches('/').to_string(),
        })
    }

    /// Convert a stored file name to a filesystem path.
    ///
    /// Names are synthesized by this crate and must stay within the root
    /// directory; anything with a separator or parent segment is rejected
    /// even though the naming module never produces one.
    fn name_to_path(&self, file_name: &str) -> StorageResult<PathBuf> {
        if file_name.contains("..")
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains('\0')
        {
            return Err(StorageError::InvalidName(format!(
                "File name contains invalid characters: {}",
                file_name
            )));
        }
        Ok(self.base_path.join(file_name))
    }

    /// Map a public URL back to a stored file name, if it is ours.
    fn file_name_from_url(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(&self.base_url)?;
        let name = rest.strip_prefix('/')?;
        if name.is_empty() || name.contains('/') {
            return None;
        }
        Some(name.to_string())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(&self, file_name: &str, data: Vec<u8>) -> StorageResult<String> {
        let path = self.name_to_path(file_name)?;
        let size = data.len();

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.url_for(file_name);

        tracing::info!(
            path = %path.display(),
            file_name = %file_name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(url)
    }

    async fn delete_by_name(&self, file_name: &str) -> StorageResult<()> {
        if file_name.trim().is_empty() {
            return Ok(());
        }

        let path = self.name_to_path(file_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            file_name = %file_name,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn delete_by_url(&self, url: &str) -> StorageResult<()> {
        if url.trim().is_empty() {
            return Ok(());
        }

        match self.file_name_from_url(url) {
            Some(name) => self.delete_by_name(&name).await,
            None => {
                tracing::debug!(url = %url, "Delete skipped: URL not managed by this store");
                Ok(())
            }
        }
    }

    async fn exists(&self, file_name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(file_name)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn url_for(&self, file_name: &str) -> String {
        format!("{}/{}", self.base_url, file_name)
    }
}
