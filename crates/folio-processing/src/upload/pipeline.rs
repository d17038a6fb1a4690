//! Upload pipeline: validate → transform → encode → store.
//!
//! Two paths share the validator and the storage sink and never mix within
//! one request: raster uploads are re-encoded to JPEG, vector uploads are
//! stored byte-for-byte after the deny-list scan. Replaced artifacts are
//! deleted only after the new files are safely on disk, so there is no
//! window with zero valid images; cleanup failures are logged and swallowed.

use crate::encoder::JpegEncoder;
use crate::image::{ImageLimits, RasterTransformer, TransformPolicy};
use crate::svg::VectorSanitizer;
use crate::upload::types::{StoredArtifact, UploadPayload};
use crate::upload::UploadError;
use crate::validator::MediaValidator;
use chrono::Utc;
use folio_core::UploadConfig;
use folio_storage::{naming, NamingKey, Storage};
use std::sync::Arc;

/// Canonical storage extension for every raster output.
const OUTPUT_EXT: &str = "jpg";
const SVG_EXT: &str = "svg";

/// Run the raster upload pipeline for one payload.
///
/// The transform policy is wired from the naming key's upload kind. On
/// success the previously stored files in `replace_urls` are removed
/// best-effort; on failure nothing new is left on disk.
pub async fn upload_image(
    payload: UploadPayload,
    key: &NamingKey,
    config: &UploadConfig,
    storage: Arc<dyn Storage>,
    replace_urls: &[String],
) -> Result<StoredArtifact, UploadError> {
    let validator = MediaValidator::for_raster(config);
    validator.validate_upload(
        &payload.file_name,
        payload.content_type.as_deref(),
        &payload.data,
    )?;

    let policy = TransformPolicy::for_kind(key.kind);
    let limits = ImageLimits::from_config(config);
    let output = RasterTransformer::transform(&payload.data, policy, &limits)
        .map_err(|e| UploadError::ImageDecode(e.to_string()))?;

    let main_bytes = JpegEncoder::encode(&output.main, config.main_jpeg_quality)
        .map_err(|e| UploadError::Encode(e.to_string()))?;
    let thumbnail_bytes = match &output.thumbnail {
        Some(thumbnail) => Some(
            JpegEncoder::encode(thumbnail, config.thumbnail_jpeg_quality)
                .map_err(|e| UploadError::Encode(e.to_string()))?,
        ),
        None => None,
    };

    let base = key.unique_base();
    let main_name = naming::main_file_name(&base, OUTPUT_EXT);
    let size_bytes = main_bytes.len() as u64;

    let main_url = storage.store(&main_name, main_bytes.to_vec()).await?;

    let (thumbnail_name, thumbnail_url) = match thumbnail_bytes {
        Some(bytes) => {
            let name = naming::thumbnail_file_name(&base, OUTPUT_EXT);
            match storage.store(&name, bytes.to_vec()).await {
                Ok(url) => (Some(name), Some(url)),
                Err(e) => {
                    // No partial artifacts: take the main file back out
                    if let Err(cleanup) = storage.delete_by_name(&main_name).await {
                        tracing::warn!(
                            file_name = %main_name,
                            error = %cleanup,
                            "Failed to roll back main artifact after thumbnail store failure"
                        );
                    }
                    return Err(e.into());
                }
            }
        }
        None => (None, None),
    };

    remove_superseded(storage.as_ref(), replace_urls).await;

    tracing::info!(
        file_name = %main_name,
        has_thumbnail = thumbnail_name.is_some(),
        size_bytes = size_bytes,
        "Image upload stored"
    );

    Ok(StoredArtifact {
        file_name: main_name,
        url: main_url,
        thumbnail_file_name: thumbnail_name,
        thumbnail_url,
        size_bytes,
        created_at: Utc::now(),
    })
}

/// Run the vector upload pipeline for one payload.
///
/// Accepted markup is stored unchanged; there is no re-encoding step on
/// this path.
pub async fn upload_vector(
    payload: UploadPayload,
    key: &NamingKey,
    config: &UploadConfig,
    storage: Arc<dyn Storage>,
    replace_urls: &[String],
) -> Result<StoredArtifact, UploadError> {
    let validator = MediaValidator::for_vector(config);
    validator.validate_upload(
        &payload.file_name,
        payload.content_type.as_deref(),
        &payload.data,
    )?;

    let sanitizer = VectorSanitizer::new().map_err(|e| UploadError::Internal(e.to_string()))?;
    sanitizer.scan(&payload.data)?;

    let base = key.unique_base();
    let file_name = naming::main_file_name(&base, SVG_EXT);
    let size_bytes = payload.data.len() as u64;

    let url = storage.store(&file_name, payload.data).await?;

    remove_superseded(storage.as_ref(), replace_urls).await;

    tracing::info!(
        file_name = %file_name,
        size_bytes = size_bytes,
        "Vector upload stored"
    );

    Ok(StoredArtifact {
        file_name,
        url,
        thumbnail_file_name: None,
        thumbnail_url: None,
        size_bytes,
        created_at: Utc::now(),
    })
}

/// Delete a stored artifact by public URL or raw file name.
///
/// Fire-and-forget semantics: absent files and foreign URLs are no-ops.
pub async fn delete_artifact(
    storage: &dyn Storage,
    reference: &str,
) -> Result<(), folio_storage::StorageError> {
    if reference.contains('/') {
        storage.delete_by_url(reference).await
    } else {
        storage.delete_by_name(reference).await
    }
}

/// Best-effort removal of replaced artifacts.
///
/// Never fails the upload that already succeeded; each failure is logged
/// on its own channel.
async fn remove_superseded(storage: &dyn Storage, urls: &[String]) {
    for url in urls {
        if let Err(e) = storage.delete_by_url(url).await {
            tracing::warn!(
                url = %url,
                error = %e,
                "Failed to remove superseded artifact"
            );
        }
    }
}
