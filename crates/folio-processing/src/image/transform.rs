//! Transform policies
//!
//! Decodes an accepted payload and applies one resize/crop policy, producing
//! the main bitmap and, for policies that need one, a square companion
//! thumbnail. All output dimensions are deterministic.

use crate::image::orientation::ImageOrientation;
use crate::image::resize::ImageResize;
use anyhow::Context;
use folio_core::{UploadConfig, UploadKind};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

/// Resize/crop strategy for one upload, selected by upload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformPolicy {
    /// Cap the width, preserve aspect ratio; square thumbnail companion.
    FullWidthCap,
    /// Largest centered square, capped at the avatar edge; no thumbnail.
    SquareCrop,
    /// Center-crop to a fixed ratio, then cap width; square thumbnail from
    /// the cropped bitmap.
    FixedAspectCrop { ratio_w: u32, ratio_h: u32 },
}

impl TransformPolicy {
    /// Default policy wiring per upload kind.
    pub fn for_kind(kind: UploadKind) -> Self {
        match kind {
            UploadKind::ProjectGallery | UploadKind::CarouselSlide => TransformPolicy::FixedAspectCrop {
                ratio_w: 16,
                ratio_h: 9,
            },
            UploadKind::ProfileAvatar => TransformPolicy::SquareCrop,
            UploadKind::ArticleInline => TransformPolicy::FullWidthCap,
        }
    }

    pub fn produces_thumbnail(&self) -> bool {
        !matches!(self, TransformPolicy::SquareCrop)
    }
}

/// Dimension limits shared by all policies.
#[derive(Debug, Clone, Copy)]
pub struct ImageLimits {
    pub max_width: u32,
    pub avatar_max_edge: u32,
    pub thumbnail_size: u32,
}

impl ImageLimits {
    pub fn from_config(config: &UploadConfig) -> Self {
        ImageLimits {
            max_width: config.max_image_width,
            avatar_max_edge: config.avatar_max_edge,
            thumbnail_size: config.thumbnail_size,
        }
    }
}

/// Result of one transform: the main bitmap plus an optional thumbnail.
pub struct TransformOutput {
    pub main: DynamicImage,
    pub thumbnail: Option<DynamicImage>,
}

/// Raster transformer applying one policy to decoded upload bytes.
pub struct RasterTransformer;

impl RasterTransformer {
    /// Decode, orient, and apply the policy.
    ///
    /// Fails only on decode: payloads reach this point with a matching
    /// signature, but a corrupt body can still fail the full parse.
    pub fn transform(
        data: &[u8],
        policy: TransformPolicy,
        limits: &ImageLimits,
    ) -> Result<TransformOutput, anyhow::Error> {
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .context("Failed to read image header")?
            .decode()
            .context("Failed to decode image body")?;

        let img = ImageOrientation::apply_exif_orientation(img, data);

        let output = match policy {
            TransformPolicy::FullWidthCap => {
                let main = Self::cap_width(img, limits.max_width);
                let thumbnail = Self::square_thumbnail(&main, limits.thumbnail_size);
                TransformOutput {
                    main,
                    thumbnail: Some(thumbnail),
                }
            }
            TransformPolicy::SquareCrop => {
                let square = Self::center_square(img);
                let side = square.width();
                let main = if side > limits.avatar_max_edge {
                    ImageResize::resize_exact(&square, limits.avatar_max_edge, limits.avatar_max_edge)
                } else {
                    square
                };
                TransformOutput {
                    main,
                    thumbnail: None,
                }
            }
            TransformPolicy::FixedAspectCrop { ratio_w, ratio_h } => {
                let cropped = Self::center_crop_to_ratio(img, ratio_w, ratio_h);
                let main = Self::cap_width(cropped, limits.max_width);
                // Thumbnail comes from the cropped bitmap, not the original
                let thumbnail = Self::square_thumbnail(&main, limits.thumbnail_size);
                TransformOutput {
                    main,
                    thumbnail: Some(thumbnail),
                }
            }
        };

        tracing::debug!(
            policy = ?policy,
            width = output.main.width(),
            height = output.main.height(),
            has_thumbnail = output.thumbnail.is_some(),
            "Raster transform complete"
        );

        Ok(output)
    }

    /// Downscale to the maximum width when wider; pass through otherwise.
    fn cap_width(img: DynamicImage, max_width: u32) -> DynamicImage {
        if img.width() > max_width {
            ImageResize::scale_to_width(&img, max_width)
        } else {
            img
        }
    }

    /// Fixed-size square thumbnail, stretched to fit regardless of aspect
    /// ratio.
    fn square_thumbnail(img: &DynamicImage, edge: u32) -> DynamicImage {
        ImageResize::resize_exact(img, edge, edge)
    }

    /// Largest centered square within the source.
    fn center_square(img: DynamicImage) -> DynamicImage {
        let (width, height) = img.dimensions();
        let side = width.min(height);
        if side == width && side == height {
            return img;
        }
        let x = (width - side) / 2;
        let y = (height - side) / 2;
        img.crop_imm(x, y, side, side)
    }

    /// Center-crop to the target ratio: equal margins off the wider axis,
    /// full extent on the other. Pass through when already at the ratio.
    fn center_crop_to_ratio(img: DynamicImage, ratio_w: u32, ratio_h: u32) -> DynamicImage {
        let (width, height) = img.dimensions();
        let lhs = width as u64 * ratio_h as u64;
        let rhs = height as u64 * ratio_w as u64;

        if lhs > rhs {
            // Relatively wider: full height, crop left/right
            let target_width = div_round(height as u64 * ratio_w as u64, ratio_h as u64)
                .clamp(1, width as u64) as u32;
            let x = (width - target_width) / 2;
            img.crop_imm(x, 0, target_width, height)
        } else if lhs < rhs {
            // Relatively taller: full width, crop top/bottom
            let target_height = div_round(width as u64 * ratio_h as u64, ratio_w as u64)
                .clamp(1, height as u64) as u32;
            let y = (height - target_height) / 2;
            img.crop_imm(0, y, width, target_height)
        } else {
            img
        }
    }
}

fn div_round(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator / 2) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    const LIMITS: ImageLimits = ImageLimits {
        max_width: 1920,
        avatar_max_edge: 512,
        thumbnail_size: 300,
    };

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        buffer
    }

    #[test]
    fn test_policy_for_kind() {
        assert_eq!(
            TransformPolicy::for_kind(UploadKind::ProfileAvatar),
            TransformPolicy::SquareCrop
        );
        assert_eq!(
            TransformPolicy::for_kind(UploadKind::ArticleInline),
            TransformPolicy::FullWidthCap
        );
        assert_eq!(
            TransformPolicy::for_kind(UploadKind::ProjectGallery),
            TransformPolicy::FixedAspectCrop {
                ratio_w: 16,
                ratio_h: 9
            }
        );
        assert!(!TransformPolicy::for_kind(UploadKind::ProfileAvatar).produces_thumbnail());
        assert!(TransformPolicy::for_kind(UploadKind::CarouselSlide).produces_thumbnail());
    }

    #[test]
    fn test_full_width_cap_passes_through_within_bound() {
        let data = png_bytes(800, 600);
        let output =
            RasterTransformer::transform(&data, TransformPolicy::FullWidthCap, &LIMITS).unwrap();
        assert_eq!(output.main.dimensions(), (800, 600));
        assert_eq!(output.thumbnail.unwrap().dimensions(), (300, 300));
    }

    #[test]
    fn test_full_width_cap_scales_down() {
        let data = png_bytes(3000, 2000);
        let output =
            RasterTransformer::transform(&data, TransformPolicy::FullWidthCap, &LIMITS).unwrap();
        // 2000 * 1920 / 3000 = 1280 exactly
        assert_eq!(output.main.dimensions(), (1920, 1280));
        assert_eq!(output.thumbnail.unwrap().dimensions(), (300, 300));
    }

    #[test]
    fn test_square_crop_landscape() {
        let data = png_bytes(800, 600);
        let output =
            RasterTransformer::transform(&data, TransformPolicy::SquareCrop, &LIMITS).unwrap();
        // Largest centered square is 600x600, above the 512 cap
        assert_eq!(output.main.dimensions(), (512, 512));
        assert!(output.thumbnail.is_none());
    }

    #[test]
    fn test_square_crop_small_source_not_upscaled() {
        let data = png_bytes(300, 400);
        let output =
            RasterTransformer::transform(&data, TransformPolicy::SquareCrop, &LIMITS).unwrap();
        assert_eq!(output.main.dimensions(), (300, 300));
    }

    #[test]
    fn test_fixed_aspect_crop_wider_source() {
        let data = png_bytes(1920, 800);
        let policy = TransformPolicy::FixedAspectCrop {
            ratio_w: 16,
            ratio_h: 9,
        };
        let output = RasterTransformer::transform(&data, policy, &LIMITS).unwrap();
        let (w, h) = output.main.dimensions();
        // Full source height kept, margins cropped off the sides
        assert_eq!(h, 800);
        let ratio = w as f64 / h as f64;
        assert!(ratio > 1.70 && ratio < 1.80, "ratio was {}", ratio);
        assert_eq!(output.thumbnail.unwrap().dimensions(), (300, 300));
    }

    #[test]
    fn test_fixed_aspect_crop_taller_source() {
        let data = png_bytes(800, 1200);
        let policy = TransformPolicy::FixedAspectCrop {
            ratio_w: 16,
            ratio_h: 9,
        };
        let output = RasterTransformer::transform(&data, policy, &LIMITS).unwrap();
        let (w, h) = output.main.dimensions();
        assert_eq!(w, 800);
        // 800 * 9 / 16 = 450 exactly
        assert_eq!(h, 450);
        let ratio = w as f64 / h as f64;
        assert!(ratio > 1.70 && ratio < 1.80, "ratio was {}", ratio);
    }

    #[test]
    fn test_fixed_aspect_crop_exact_ratio_passes_through() {
        let data = png_bytes(1600, 900);
        let policy = TransformPolicy::FixedAspectCrop {
            ratio_w: 16,
            ratio_h: 9,
        };
        let output = RasterTransformer::transform(&data, policy, &LIMITS).unwrap();
        assert_eq!(output.main.dimensions(), (1600, 900));
    }

    #[test]
    fn test_fixed_aspect_crop_caps_width_after_crop() {
        let data = png_bytes(4000, 1200);
        let policy = TransformPolicy::FixedAspectCrop {
            ratio_w: 16,
            ratio_h: 9,
        };
        let output = RasterTransformer::transform(&data, policy, &LIMITS).unwrap();
        let (w, h) = output.main.dimensions();
        // Crop to 2133x1200, then cap: 1920 wide, 1080 high
        assert_eq!(w, 1920);
        assert_eq!(h, 1080);
    }

    #[test]
    fn test_corrupt_body_fails_decode() {
        // Valid PNG signature, garbage body
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.resize(256, 0x41);
        let result = RasterTransformer::transform(&data, TransformPolicy::FullWidthCap, &LIMITS);
        assert!(result.is_err());
    }

    #[test]
    fn test_jpeg_source_decodes() {
        let img = RgbaImage::from_pixel(640, 480, Rgba([10, 20, 30, 255]));
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        image::DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .write_to(&mut cursor, ImageFormat::Jpeg)
            .unwrap();

        let output =
            RasterTransformer::transform(&buffer, TransformPolicy::FullWidthCap, &LIMITS).unwrap();
        assert_eq!(output.main.dimensions(), (640, 480));
    }

    #[test]
    fn test_center_crop_margins_are_centered() {
        // 10x4 image with a marker column at x=5; crop to 1:1 keeps x 3..7
        let mut img = RgbaImage::from_pixel(10, 4, Rgba([0, 0, 0, 255]));
        for y in 0..4 {
            img.put_pixel(5, y, Rgba([255, 255, 255, 255]));
        }
        let cropped = RasterTransformer::center_crop_to_ratio(
            DynamicImage::ImageRgba8(img),
            1,
            1,
        );
        assert_eq!(cropped.dimensions(), (4, 4));
        // Marker column lands at x=2 within the crop
        let rgba = cropped.to_rgba8();
        assert_eq!(rgba.get_pixel(2, 0)[0], 255);
        assert_eq!(rgba.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_div_round() {
        assert_eq!(div_round(1422, 1), 1422);
        assert_eq!(div_round(800 * 16, 9), 1422); // 1422.2 rounds down
        assert_eq!(div_round(3, 2), 2); // 1.5 rounds up
    }
}
