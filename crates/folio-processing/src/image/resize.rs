//! Resize primitives shared by the transform policies.

use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Select the interpolation filter based on the resize ratio.
    ///
    /// Heavier downscales tolerate cheaper filters; mild ones keep Lanczos
    /// for sharpness. Nearest-neighbor is never used.
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Resize to exact target dimensions, ignoring aspect ratio.
    pub fn resize_exact(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Height that preserves aspect ratio at the given target width, rounded
    /// to the nearest integer pixel.
    pub fn proportional_height(orig_width: u32, orig_height: u32, target_width: u32) -> u32 {
        let scaled = orig_height as f64 * target_width as f64 / orig_width as f64;
        (scaled.round() as u32).max(1)
    }

    /// Scale down to the target width, height recomputed proportionally.
    pub fn scale_to_width(img: &DynamicImage, target_width: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let target_height = Self::proportional_height(orig_width, orig_height, target_width);
        Self::resize_exact(img, target_width, target_height)
    }
}
