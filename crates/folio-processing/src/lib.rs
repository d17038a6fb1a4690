//! Folio Processing Library
//!
//! The upload validation and transformation pipeline: signature-sniffing
//! validation, raster decode/resize/crop, JPEG encoding, SVG sanitization,
//! and the upload entry points that tie them to storage.
//!
//! Control flow: caller → validator (fail fast) → raster transform → encode →
//! store, or validator → vector sanitize → store. The two paths never mix
//! within one request; storage is the single shared sink.

pub mod encoder;
pub mod image;
pub mod signature;
pub mod svg;
pub mod upload;
pub mod validator;

// Re-export commonly used types
pub use encoder::JpegEncoder;
pub use image::{ImageLimits, RasterTransformer, TransformOutput, TransformPolicy};
pub use signature::ImageKind;
pub use svg::VectorSanitizer;
pub use upload::pipeline::{delete_artifact, upload_image, upload_vector};
pub use upload::types::{StoredArtifact, UploadPayload};
pub use upload::UploadError;
pub use validator::{MediaValidator, ValidationError};
