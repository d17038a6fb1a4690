//! EXIF orientation correction
//!
//! Cameras record sensor orientation instead of rotating pixels; the stored
//! artifact must carry upright pixels because EXIF is dropped on re-encode.

use image::{imageops, DynamicImage};

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Apply EXIF orientation correction to a decoded image.
    ///
    /// Payloads without EXIF (or with an unreadable block) pass through
    /// unchanged.
    pub fn apply_exif_orientation(mut img: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = Self::read_exif_orientation(data);
        let (rotate, flip_h, flip_v) = Self::orientation_transforms(orientation);

        if orientation != 1 {
            tracing::debug!(
                orientation = orientation,
                rotate = ?rotate,
                flip_horizontal = flip_h,
                flip_vertical = flip_v,
                "Applying EXIF orientation"
            );
        }

        // Apply rotation first
        if let Some(angle) = rotate {
            img = Self::rotate_by_angle(img, angle);
        }

        // Then apply flips
        if flip_h {
            img = DynamicImage::ImageRgba8(imageops::flip_horizontal(&img.to_rgba8()));
        }
        if flip_v {
            img = DynamicImage::ImageRgba8(imageops::flip_vertical(&img.to_rgba8()));
        }

        img
    }

    /// Read the EXIF orientation tag (1-8); 1 (normal) when absent.
    pub fn read_exif_orientation(data: &[u8]) -> u8 {
        let mut cursor = std::io::Cursor::new(data);
        let reader = match exif::Reader::new().read_from_container(&mut cursor) {
            Ok(reader) => reader,
            Err(_) => return 1,
        };

        reader
            .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(|v| v as u8)
            .filter(|v| (1..=8).contains(v))
            .unwrap_or(1)
    }

    /// Rotation and flip operations for a given EXIF orientation.
    /// Returns (rotate_angle, flip_horizontal, flip_vertical).
    pub fn orientation_transforms(orientation: u8) -> (Option<u16>, bool, bool) {
        match orientation {
            1 => (None, false, false),      // Normal
            2 => (None, true, false),       // Mirror horizontal
            3 => (Some(180), false, false), // Rotate 180
            4 => (None, false, true),       // Mirror vertical
            5 => (Some(270), true, false),  // Mirror horizontal + Rotate 270 CW
            6 => (Some(90), false, false),  // Rotate 90 CW
            7 => (Some(90), true, false),   // Mirror horizontal + Rotate 90 CW
            8 => (Some(270), false, false), // Rotate 270 CW
            _ => (None, false, false),      // Invalid, treat as normal
        }
    }

    /// Rotate image by specified angle (90, 180, or 270 degrees clockwise)
    pub fn rotate_by_angle(img: DynamicImage, angle: u16) -> DynamicImage {
        match angle {
            90 => DynamicImage::ImageRgba8(imageops::rotate90(&img.to_rgba8())),
            180 => DynamicImage::ImageRgba8(imageops::rotate180(&img.to_rgba8())),
            270 => DynamicImage::ImageRgba8(imageops::rotate270(&img.to_rgba8())),
            _ => img,
        }
    }
}
