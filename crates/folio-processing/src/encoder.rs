//! JPEG encoder
//!
//! Every raster output is serialized to the one canonical storage codec.
//! Encoding failures are fatal for the request; there is no fallback format.

use anyhow::Result;
use bytes::Bytes;
use image::DynamicImage;

/// JPEG encoding at a configured quality factor.
pub struct JpegEncoder;

impl JpegEncoder {
    /// Serialize a bitmap to progressive JPEG.
    ///
    /// Thumbnails are encoded at a lower quality than main images; the
    /// caller passes the factor from configuration.
    pub fn encode(img: &DynamicImage, quality: u8) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(Bytes::from(jpeg_data))
    }
}
