//! Upload validator
//!
//! Stateless checks over raw bytes plus the declared file name and MIME type,
//! run before any decoding. Checks are ordered cheapest first and
//! short-circuit on the first failure so oversized or mis-typed payloads
//! never reach a decoder.

use crate::signature::{self, ImageKind};
use folio_core::UploadConfig;
use std::path::Path;

/// Categorized rejection reasons, returned rather than thrown so callers can
/// map each to a distinct user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty file")]
    EmptyFile,

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File name contains path traversal: {0}")]
    PathTraversal(String),

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("File too small: {size} bytes (min: {min} bytes)")]
    FileTooSmall { size: usize, min: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Missing content type")]
    MissingContentType,

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File content does not match declared type: not a valid {expected} image")]
    SignatureMismatch { expected: String },

    #[error("File content is not valid SVG markup")]
    NotSvg,

    #[error("Dangerous content detected: {0}")]
    DangerousContent(String),
}

impl ValidationError {
    /// Machine-readable reason code for collaborators.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::EmptyFile => "empty_file",
            ValidationError::InvalidFilename(_) => "invalid_filename",
            ValidationError::PathTraversal(_) => "path_traversal",
            ValidationError::FileTooLarge { .. } => "file_too_large",
            ValidationError::FileTooSmall { .. } => "file_too_small",
            ValidationError::InvalidExtension { .. } => "invalid_extension",
            ValidationError::MissingContentType => "missing_content_type",
            ValidationError::InvalidContentType { .. } => "invalid_content_type",
            ValidationError::SignatureMismatch { .. } => "signature_mismatch",
            ValidationError::NotSvg => "not_svg",
            ValidationError::DangerousContent(_) => "dangerous_content",
        }
    }
}

/// Upload validator
///
/// Holds the size bounds and allow-lists for one upload path (raster or
/// vector) without coupling to storage or transform details.
pub struct MediaValidator {
    min_file_size: usize,
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(
        min_file_size: usize,
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            min_file_size,
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    /// Validator for the raster upload path.
    pub fn for_raster(config: &UploadConfig) -> Self {
        Self::new(
            config.min_file_size_bytes,
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
            config.allowed_content_types.clone(),
        )
    }

    /// Validator for the vector (SVG) upload path.
    pub fn for_vector(config: &UploadConfig) -> Self {
        Self::new(
            config.min_file_size_bytes,
            config.max_file_size_bytes,
            config.svg_allowed_extensions.clone(),
            config.svg_allowed_content_types.clone(),
        )
    }

    /// Run all checks in order, short-circuiting on the first failure.
    ///
    /// Returns the sniffed [`ImageKind`] so downstream stages never re-derive
    /// it from the untrusted declared name.
    pub fn validate_upload(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<ImageKind, ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::EmptyFile);
        }

        // The stored name is always synthesized; the declared name is only
        // ever used for its extension. Traversal patterns are still rejected
        // outright rather than silently normalized.
        if contains_traversal(file_name) {
            return Err(ValidationError::PathTraversal(file_name.to_string()));
        }

        if data.len() > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size: data.len(),
                max: self.max_file_size,
            });
        }

        let extension = self.validate_extension(file_name)?;
        self.validate_content_type(content_type)?;

        // Sniffing needs a minimum number of header bytes; truncated or
        // placeholder payloads fail here before any byte inspection.
        if data.len() < self.min_file_size {
            return Err(ValidationError::FileTooSmall {
                size: data.len(),
                min: self.min_file_size,
            });
        }

        let kind = ImageKind::from_extension(&extension).ok_or_else(|| {
            ValidationError::InvalidExtension {
                extension: extension.clone(),
                allowed: self.allowed_extensions.clone(),
            }
        })?;

        if !signature::matches(data, kind) {
            return Err(match kind {
                ImageKind::Svg => ValidationError::NotSvg,
                _ => ValidationError::SignatureMismatch {
                    expected: extension,
                },
            });
        }

        Ok(kind)
    }

    /// Validate the declared extension and return it lower-cased.
    pub fn validate_extension(&self, file_name: &str) -> Result<String, ValidationError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(file_name.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    /// Validate the declared content type (case-insensitive).
    pub fn validate_content_type(&self, content_type: Option<&str>) -> Result<(), ValidationError> {
        let content_type = match content_type {
            Some(ct) if !ct.trim().is_empty() => ct,
            _ => return Err(ValidationError::MissingContentType),
        };

        let normalized = content_type.to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct == &normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }
}

/// Detect parent-directory segments, absolute roots, or NUL bytes in a
/// declared file name.
fn contains_traversal(file_name: &str) -> bool {
    if file_name.contains('\0') {
        return true;
    }
    if file_name.starts_with('/') || file_name.starts_with('\\') {
        return true;
    }
    file_name.split(['/', '\\']).any(|segment| segment == "..")
}
