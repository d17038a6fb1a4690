//! Upload pipeline: validate → transform → encode → store.

pub mod pipeline;
pub mod types;

use crate::validator::ValidationError;
use folio_storage::StorageError;

/// Unified failure category for one upload call, distinguishable by reason
/// code. Validation and decode failures are recoverable by the caller;
/// encode and storage failures are fatal for the request.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    #[error("Image encode failed: {0}")]
    Encode(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl UploadError {
    /// Machine-readable reason code; never leaks internal paths.
    pub fn error_code(&self) -> &'static str {
        match self {
            UploadError::Validation(e) => e.error_code(),
            UploadError::ImageDecode(_) => "image_decode_failed",
            UploadError::Encode(_) => "image_encode_failed",
            UploadError::Storage(_) => "storage_failed",
            UploadError::Internal(_) => "internal",
        }
    }

    /// Whether the caller can recover by asking the user to re-upload.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            UploadError::Validation(_) | UploadError::ImageDecode(_)
        )
    }
}
