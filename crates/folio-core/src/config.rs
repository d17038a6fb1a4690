//! Configuration module
//!
//! Upload pipeline settings: storage location, public URL mapping, size
//! limits, allow-lists, and transform dimensions. Built once from the
//! environment at startup and treated as immutable for the process lifetime.

use std::env;

// Defaults
const MAX_FILE_SIZE_MB: usize = 10;
const MIN_FILE_BYTES: usize = 32;
const MAX_IMAGE_WIDTH: u32 = 1920;
const AVATAR_MAX_EDGE: u32 = 512;
const THUMBNAIL_SIZE: u32 = 300;
const MAIN_JPEG_QUALITY: u8 = 85;
const THUMBNAIL_JPEG_QUALITY: u8 = 70;

/// Upload pipeline configuration snapshot.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Root directory all artifacts are written into (flat, no nesting).
    pub upload_dir: String,
    /// Public base path prefixed to stored file names to form URLs.
    pub public_base_path: String,
    pub max_file_size_bytes: usize,
    /// Absolute floor below which payloads are rejected before sniffing.
    pub min_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub svg_allowed_extensions: Vec<String>,
    pub svg_allowed_content_types: Vec<String>,
    /// Widest a stored main image may be; wider sources are scaled down.
    pub max_image_width: u32,
    /// Edge cap for square-cropped avatar images.
    pub avatar_max_edge: u32,
    /// Edge length of the square companion thumbnail.
    pub thumbnail_size: u32,
    pub main_jpeg_quality: u8,
    pub thumbnail_jpeg_quality: u8,
}

impl Default for UploadConfig {
    fn default() -> Self {
        UploadConfig {
            upload_dir: "./uploads".to_string(),
            public_base_path: "/uploads".to_string(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            min_file_size_bytes: MIN_FILE_BYTES,
            allowed_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            svg_allowed_extensions: vec!["svg".to_string()],
            svg_allowed_content_types: vec!["image/svg+xml".to_string()],
            max_image_width: MAX_IMAGE_WIDTH,
            avatar_max_edge: AVATAR_MAX_EDGE,
            thumbnail_size: THUMBNAIL_SIZE,
            main_jpeg_quality: MAIN_JPEG_QUALITY,
            thumbnail_jpeg_quality: THUMBNAIL_JPEG_QUALITY,
        }
    }
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = UploadConfig::default();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.allowed_extensions);

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.allowed_content_types);

        let svg_allowed_extensions = env::var("SVG_ALLOWED_EXTENSIONS")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.svg_allowed_extensions);

        let svg_allowed_content_types = env::var("SVG_ALLOWED_CONTENT_TYPES")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.svg_allowed_content_types);

        let config = UploadConfig {
            upload_dir: env::var("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            public_base_path: env::var("PUBLIC_BASE_PATH").unwrap_or(defaults.public_base_path),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            min_file_size_bytes: env::var("MIN_FILE_BYTES")
                .unwrap_or_else(|_| MIN_FILE_BYTES.to_string())
                .parse()
                .unwrap_or(MIN_FILE_BYTES),
            allowed_extensions,
            allowed_content_types,
            svg_allowed_extensions,
            svg_allowed_content_types,
            max_image_width: env::var("MAX_IMAGE_WIDTH")
                .unwrap_or_else(|_| MAX_IMAGE_WIDTH.to_string())
                .parse()
                .unwrap_or(MAX_IMAGE_WIDTH),
            avatar_max_edge: env::var("AVATAR_MAX_EDGE")
                .unwrap_or_else(|_| AVATAR_MAX_EDGE.to_string())
                .parse()
                .unwrap_or(AVATAR_MAX_EDGE),
            thumbnail_size: env::var("THUMBNAIL_SIZE")
                .unwrap_or_else(|_| THUMBNAIL_SIZE.to_string())
                .parse()
                .unwrap_or(THUMBNAIL_SIZE),
            main_jpeg_quality: env::var("MAIN_JPEG_QUALITY")
                .unwrap_or_else(|_| MAIN_JPEG_QUALITY.to_string())
                .parse()
                .unwrap_or(MAIN_JPEG_QUALITY),
            thumbnail_jpeg_quality: env::var("THUMBNAIL_JPEG_QUALITY")
                .unwrap_or_else(|_| THUMBNAIL_JPEG_QUALITY.to_string())
                .parse()
                .unwrap_or(THUMBNAIL_JPEG_QUALITY),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_dir.trim().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR cannot be empty"));
        }
        if !self.public_base_path.starts_with('/') {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_PATH must start with '/': {}",
                self.public_base_path
            ));
        }
        if self.min_file_size_bytes >= self.max_file_size_bytes {
            return Err(anyhow::anyhow!(
                "MIN_FILE_BYTES ({}) must be below MAX_FILE_SIZE_MB ({} bytes)",
                self.min_file_size_bytes,
                self.max_file_size_bytes
            ));
        }
        if self.allowed_extensions.is_empty() || self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS and ALLOWED_CONTENT_TYPES cannot be empty"
            ));
        }
        if self.max_image_width == 0 || self.avatar_max_edge == 0 || self.thumbnail_size == 0 {
            return Err(anyhow::anyhow!("Image dimension limits must be non-zero"));
        }
        for (name, q) in [
            ("MAIN_JPEG_QUALITY", self.main_jpeg_quality),
            ("THUMBNAIL_JPEG_QUALITY", self.thumbnail_jpeg_quality),
        ] {
            if q == 0 || q > 100 {
                return Err(anyhow::anyhow!("{} must be within 1-100, got {}", name, q));
            }
        }
        Ok(())
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}
