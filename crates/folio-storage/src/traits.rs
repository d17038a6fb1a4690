//! Storage abstraction trait
//!
//! This module defines the Storage trait the upload pipeline writes through.
//! The pipeline never touches paths directly; ownership of bytes on disk
//! transfers to the backend once `store` returns, and callers refer to
//! artifacts only by file name or public URL afterwards.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The single shared sink for both the raster and vector upload paths.
/// Deletes are idempotent: absent files, blank names, and URLs that do not
/// map to a locally managed file are no-ops, not errors, because callers may
/// hold stale or externally constructed references.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a file and return its public URL.
    async fn store(&self, file_name: &str, data: Vec<u8>) -> StorageResult<String>;

    /// Delete a file by its stored name. No-op if absent or blank.
    async fn delete_by_name(&self, file_name: &str) -> StorageResult<()>;

    /// Delete a file by its public URL. No-op for URLs outside this store.
    async fn delete_by_url(&self, url: &str) -> StorageResult<()>;

    /// Check whether a stored file exists.
    async fn exists(&self, file_name: &str) -> StorageResult<bool>;

    /// Map a stored file name to its public URL.
    fn url_for(&self, file_name: &str) -> String;
}
