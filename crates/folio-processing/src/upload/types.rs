//! Types for the upload pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw upload as received from the caller. Every field is untrusted until
/// the validator has passed it.
#[derive(Clone, Debug)]
pub struct UploadPayload {
    pub data: Vec<u8>,
    /// Declared original file name; only its extension is ever consulted.
    pub file_name: String,
    /// Declared MIME type, if the client sent one.
    pub content_type: Option<String>,
}

impl UploadPayload {
    pub fn new(
        data: Vec<u8>,
        file_name: impl Into<String>,
        content_type: Option<String>,
    ) -> Self {
        UploadPayload {
            data,
            file_name: file_name.into(),
            content_type,
        }
    }
}

/// Persisted result of one upload. Callers interact with the files only
/// through these URLs; the bytes on disk belong to storage.
#[derive(Clone, Debug, Serialize)]
pub struct StoredArtifact {
    pub file_name: String,
    pub url: String,
    pub thumbnail_file_name: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Byte size of the stored main artifact.
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}
